mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod flow;
pub use flow::*;

mod image;
pub use self::image::*;

mod margins;
pub use margins::*;

mod pagesize;
pub use pagesize::*;

/// The PDF rendering backend: a [Surface] implementation that writes the
/// accumulated pages out with [pdf_writer]
pub mod pdf;

mod rect;
pub use rect::*;

mod style;
pub use style::*;

mod surface;
pub use surface::*;

mod table;
pub use table::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
