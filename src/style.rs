use crate::colour::{colours, Colour};
use crate::error::FlowError;
use crate::units::Pt;
use std::collections::HashMap;
use std::str::FromStr;

/// Horizontal alignment of text within its available width
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Centre,
    Right,
    /// Left- and right-aligned at once: inter-word spacing is stretched so
    /// every line except the last fills the available width
    Justified,
}

impl FromStr for Alignment {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Alignment, FlowError> {
        match s {
            "left" => Ok(Alignment::Left),
            "centre" | "center" => Ok(Alignment::Centre),
            "right" => Ok(Alignment::Right),
            "justified" | "justify" => Ok(Alignment::Justified),
            other => Err(FlowError::InvalidMode(other.to_string())),
        }
    }
}

/// A named paragraph style: which font to set text in, how large, how it is
/// aligned, how far apart consecutive lines sit, and its colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Name of the font on the drawing surface, e.g. `"Helvetica"`
    pub font_name: String,
    pub size: Pt,
    pub alignment: Alignment,
    /// Vertical distance from one baseline to the next
    pub leading: Pt,
    pub colour: Colour,
}

impl Style {
    /// Create a style with the given font and size; alignment defaults to
    /// left, leading to the font size, and the colour to black
    pub fn new<S: ToString>(font_name: S, size: Pt) -> Style {
        Style {
            font_name: font_name.to_string(),
            size,
            alignment: Alignment::Left,
            leading: size,
            colour: colours::BLACK,
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Style {
        self.alignment = alignment;
        self
    }

    pub fn with_leading(mut self, leading: Pt) -> Style {
        self.leading = leading;
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Style {
        self.colour = colour;
        self
    }
}

/// A named table style: fonts and colours for the body, grid line appearance,
/// and (optionally) a distinctly-styled header row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_name: String,
    pub font_size: Pt,
    pub text_colour: Colour,
    pub background_colour: Colour,
    pub grid_colour: Colour,
    pub grid_width: Pt,
    /// When set, row 0 is treated as a header: it gets the header colours,
    /// and pagination repeats it at the top of every continuation page
    pub header: bool,
    pub header_colour: Colour,
    pub header_text_colour: Colour,
}

impl Default for TableStyle {
    fn default() -> TableStyle {
        TableStyle {
            font_name: "Helvetica-Bold".to_string(),
            font_size: Pt(8.0),
            text_colour: colours::BLACK,
            background_colour: colours::WHITE,
            grid_colour: colours::BLACK,
            grid_width: Pt(1.0),
            header: true,
            header_colour: colours::GREY,
            header_text_colour: colours::WHITE,
        }
    }
}

impl TableStyle {
    /// The paragraph sub-style used to wrap cell text of the header row
    pub fn header_text_style(&self) -> Style {
        Style {
            font_name: self.font_name.clone(),
            size: self.font_size,
            alignment: Alignment::Centre,
            leading: self.font_size + Pt(2.0),
            colour: self.header_text_colour,
        }
    }

    /// The paragraph sub-style used to wrap cell text of body rows
    pub fn body_text_style(&self) -> Style {
        Style {
            font_name: self.font_name.clone(),
            size: self.font_size,
            alignment: Alignment::Centre,
            leading: self.font_size + Pt(2.0),
            colour: self.text_colour,
        }
    }
}

/// Named paragraph styles owned by a single document. Re-registering a name
/// overwrites the previous style.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: HashMap<String, Style>,
}

impl Default for StyleRegistry {
    /// A registry pre-loaded with the `title`, `paragraph`, and `page_number`
    /// styles every document starts with
    fn default() -> StyleRegistry {
        let mut registry = StyleRegistry {
            styles: HashMap::new(),
        };
        registry.define(
            "title",
            Style::new("Helvetica-Bold", Pt(14.0)).with_leading(Pt(14.0)),
        );
        registry.define(
            "paragraph",
            Style::new("Helvetica", Pt(12.0))
                .with_alignment(Alignment::Justified)
                .with_leading(Pt(12.0)),
        );
        registry.define(
            "page_number",
            Style::new("Helvetica", Pt(12.0))
                .with_alignment(Alignment::Centre)
                .with_leading(Pt(12.0)),
        );
        registry
    }
}

impl StyleRegistry {
    pub fn define<S: ToString>(&mut self, name: S, style: Style) {
        self.styles.insert(name.to_string(), style);
    }

    pub fn get(&self, name: &str) -> Result<&Style, FlowError> {
        self.styles
            .get(name)
            .ok_or_else(|| FlowError::UnknownStyle(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }
}

/// Named table styles owned by a single document; overwrite semantics as
/// with [StyleRegistry]
#[derive(Debug, Clone)]
pub struct TableStyleRegistry {
    styles: HashMap<String, TableStyle>,
}

impl Default for TableStyleRegistry {
    /// A registry pre-loaded with the `table` (header row on) and `no_header`
    /// styles every document starts with
    fn default() -> TableStyleRegistry {
        let mut registry = TableStyleRegistry {
            styles: HashMap::new(),
        };
        registry.define("table", TableStyle::default());
        registry.define(
            "no_header",
            TableStyle {
                header: false,
                header_colour: colours::WHITE,
                header_text_colour: colours::BLACK,
                ..TableStyle::default()
            },
        );
        registry
    }
}

impl TableStyleRegistry {
    pub fn define<S: ToString>(&mut self, name: S, style: TableStyle) {
        self.styles.insert(name.to_string(), style);
    }

    pub fn get(&self, name: &str) -> Result<&TableStyle, FlowError> {
        self.styles
            .get(name)
            .ok_or_else(|| FlowError::UnknownTableStyle(name.to_string()))
    }
}
