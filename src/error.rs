use std::path::PathBuf;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("style '{0}' is not registered on the document")]
    /// A content operation referenced a paragraph style name that was never defined
    UnknownStyle(String),

    #[error("table style '{0}' is not registered on the document")]
    /// A table operation referenced a table style name that was never defined
    UnknownTableStyle(String),

    #[error("scale factors and size multipliers must be positive and finite")]
    /// An image was given a non-positive or non-finite scale/width/height factor
    InvalidDimension,

    #[error("'{0}' is not a valid placement mode or anchor")]
    /// A placement mode or anchor string could not be parsed
    InvalidMode(String),

    #[error("cannot open image file {0:?}")]
    /// The image file does not exist or could not be read
    ImageNotFound(PathBuf),

    #[error(transparent)]
    /// [image] failed to decode the image
    ImageDecode(#[from] image::ImageError),

    #[error("table rows are not rectangular: row {row} has {found} cells, expected {expected}")]
    /// Table input rows do not all have the same number of cells, or a fixed
    /// column-width list does not match the column count
    MalformedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("content cannot fit on an empty page")]
    /// A single unsplittable element (one word, one table row) overflows even a
    /// fresh page, so pagination cannot make progress
    ContentTooLarge,

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a font face
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),
}
