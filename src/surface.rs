use crate::error::FlowError;
use crate::rect::Rect;
use crate::style::{Style, TableStyle};
use crate::units::Pt;
use std::path::Path;

/// A styled run of text, ready to be measured or drawn. The run wraps within
/// and is aligned inside `width`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: Style,
    pub width: Pt,
}

impl TextRun {
    pub fn new<S: ToString>(text: S, style: Style, width: Pt) -> TextRun {
        TextRun {
            text: text.to_string(),
            style,
            width,
        }
    }
}

/// A single table cell as handed to the drawing surface
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Set on a single line, never wrapped
    Raw(String),
    /// Wrapped as a paragraph within the cell's column
    Wrapped { text: String, style: Style },
}

/// A contiguous slice of table rows together with everything the surface
/// needs to size and draw them
#[derive(Debug, Clone, Copy)]
pub struct TableSlice<'a> {
    pub rows: &'a [Vec<Cell>],
    /// Explicit column widths; [None] asks the surface to size columns from
    /// their content
    pub widths: Option<&'a [Pt]>,
    pub style: &'a TableStyle,
    /// Whether row 0 of this slice is the table's header row
    pub header_row: bool,
}

/// The drawing surface the flow engine delegates to. The engine decides
/// geometry and ordering; the surface measures rendered sizes and puts ink on
/// pages.
///
/// Coordinates are in page space: origin at the lower-left corner of the
/// page, y increasing upward, all distances in [Pt]. `(x, y)` is always the
/// lower-left corner of the element being drawn.
///
/// Measurement must be consistent with drawing: content drawn at the size
/// reported by the corresponding `measure_*` call must fit it exactly.
pub trait Surface {
    /// Measure the rendered size of a wrapped text run: the widest line and
    /// the total height of all lines
    fn measure_text(&self, run: &TextRun) -> (Pt, Pt);

    /// Draw a wrapped text run with its lower-left corner at `(x, y)`
    fn draw_text(&mut self, run: &TextRun, x: Pt, y: Pt) -> Result<(), FlowError>;

    /// Measure the rendered size of a slice of table rows
    fn measure_table(&self, slice: &TableSlice) -> (Pt, Pt);

    /// Draw a slice of table rows with its lower-left corner at `(x, y)`
    fn draw_table(&mut self, slice: &TableSlice, x: Pt, y: Pt) -> Result<(), FlowError>;

    /// Draw an image scaled into `position`
    fn draw_image(&mut self, file: &Path, position: Rect) -> Result<(), FlowError>;

    /// Finish the current page and start a new, empty one
    fn commit_page(&mut self);

    /// Close the output, writing whatever artifact the surface produces.
    /// The engine guarantees the final page was committed beforehand.
    fn finalize(&mut self) -> Result<(), FlowError>;
}

/// Reads the pixel dimensions of image files for the placement engine
pub trait ImageDecoder {
    fn decode_dimensions(&self, file: &Path) -> Result<(u32, u32), FlowError>;
}

/// The default decoder: reads dimensions from the file header on disk via
/// the [image] crate, without decoding pixel data
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageDecoder;

impl ImageDecoder for FsImageDecoder {
    fn decode_dimensions(&self, file: &Path) -> Result<(u32, u32), FlowError> {
        image::image_dimensions(file).map_err(|err| match err {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                FlowError::ImageNotFound(file.to_owned())
            }
            other => FlowError::ImageDecode(other),
        })
    }
}
