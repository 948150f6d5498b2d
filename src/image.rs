use crate::error::FlowError;
use crate::flow::PageGeometry;
use crate::rect::Rect;
use crate::units::Pt;
use std::path::PathBuf;
use std::str::FromStr;

/// Horizontal reference edge for absolutely-positioned images
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum AnchorX {
    /// Offset rightward from the left page edge
    #[default]
    Left,
    /// Offset rightward from the page centre
    Centre,
    /// Offset leftward from the right page edge
    Right,
}

impl FromStr for AnchorX {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<AnchorX, FlowError> {
        match s {
            "left" => Ok(AnchorX::Left),
            "centre" | "center" => Ok(AnchorX::Centre),
            "right" => Ok(AnchorX::Right),
            other => Err(FlowError::InvalidMode(other.to_string())),
        }
    }
}

/// Vertical reference edge for absolutely-positioned images
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum AnchorY {
    /// Offset downward from the top page edge
    #[default]
    Top,
    /// Offset downward from the page centre
    Centre,
    /// Offset upward from the bottom page edge
    Bottom,
}

impl FromStr for AnchorY {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<AnchorY, FlowError> {
        match s {
            "top" => Ok(AnchorY::Top),
            "centre" | "center" => Ok(AnchorY::Centre),
            "bottom" => Ok(AnchorY::Bottom),
            other => Err(FlowError::InvalidMode(other.to_string())),
        }
    }
}

/// Where an image lands on the page
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum ImagePlacement {
    /// Left-aligned at the left margin, top edge at the flow cursor; the
    /// cursor advances past the image
    #[default]
    Flow,
    /// Horizontally centred on the page, top edge at the flow cursor; the
    /// cursor advances past the image
    Centred,
    /// A fixed position resolved from the anchors, independent of both the
    /// cursor and the margins; the cursor does not move
    Absolute {
        x: Pt,
        y: Pt,
        anchor_x: AnchorX,
        anchor_y: AnchorY,
    },
}

impl FromStr for ImagePlacement {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<ImagePlacement, FlowError> {
        match s {
            "default" => Ok(ImagePlacement::Flow),
            "centre" | "center" => Ok(ImagePlacement::Centred),
            "absolute" => Ok(ImagePlacement::Absolute {
                x: Pt::ZERO,
                y: Pt::ZERO,
                anchor_x: AnchorX::Left,
                anchor_y: AnchorY::Top,
            }),
            other => Err(FlowError::InvalidMode(other.to_string())),
        }
    }
}

/// How to size and place an image added to the document. The drawn size is
/// `pixel size × scale × width/height factor`, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub scale: f32,
    pub width_factor: f32,
    pub height_factor: f32,
    pub placement: ImagePlacement,
}

impl Default for ImageOptions {
    fn default() -> ImageOptions {
        ImageOptions {
            scale: 1.0,
            width_factor: 1.0,
            height_factor: 1.0,
            placement: ImagePlacement::Flow,
        }
    }
}

impl ImageOptions {
    pub fn with_scale(mut self, scale: f32) -> ImageOptions {
        self.scale = scale;
        self
    }

    pub fn with_factors(mut self, width: f32, height: f32) -> ImageOptions {
        self.width_factor = width;
        self.height_factor = height;
        self
    }

    pub fn with_placement(mut self, placement: ImagePlacement) -> ImageOptions {
        self.placement = placement;
        self
    }

    /// Scale factors are validated eagerly, before any decoding or
    /// measurement work happens
    pub(crate) fn validate(&self) -> Result<(), FlowError> {
        for factor in [self.scale, self.width_factor, self.height_factor] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(FlowError::InvalidDimension);
            }
        }
        Ok(())
    }

    /// The drawn size of an image with the given pixel dimensions
    pub(crate) fn scaled_size(&self, pixels: (u32, u32)) -> (Pt, Pt) {
        (
            Pt(pixels.0 as f32 * self.scale * self.width_factor),
            Pt(pixels.1 as f32 * self.scale * self.height_factor),
        )
    }
}

/// An image that is re-drawn identically on every page at finalization, such
/// as a watermark or letterhead logo. Always placed absolutely.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImage {
    pub file: PathBuf,
    pub scale: f32,
    pub width_factor: f32,
    pub height_factor: f32,
    pub x: Pt,
    pub y: Pt,
    pub anchor_x: AnchorX,
    pub anchor_y: AnchorY,
}

impl TemplateImage {
    pub fn new<P: Into<PathBuf>>(file: P) -> TemplateImage {
        TemplateImage {
            file: file.into(),
            scale: 1.0,
            width_factor: 1.0,
            height_factor: 1.0,
            x: Pt::ZERO,
            y: Pt::ZERO,
            anchor_x: AnchorX::Left,
            anchor_y: AnchorY::Top,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> TemplateImage {
        self.scale = scale;
        self
    }

    pub fn with_factors(mut self, width: f32, height: f32) -> TemplateImage {
        self.width_factor = width;
        self.height_factor = height;
        self
    }

    pub fn with_offset(mut self, x: Pt, y: Pt) -> TemplateImage {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_anchors(mut self, anchor_x: AnchorX, anchor_y: AnchorY) -> TemplateImage {
        self.anchor_x = anchor_x;
        self.anchor_y = anchor_y;
        self
    }

    pub(crate) fn options(&self) -> ImageOptions {
        ImageOptions {
            scale: self.scale,
            width_factor: self.width_factor,
            height_factor: self.height_factor,
            placement: ImagePlacement::Absolute {
                x: self.x,
                y: self.y,
                anchor_x: self.anchor_x,
                anchor_y: self.anchor_y,
            },
        }
    }
}

/// Resolve the page rectangle of an absolutely-positioned image of the given
/// drawn size. Offsets are measured from the anchor edges and are independent
/// of the margins.
pub(crate) fn absolute_position(
    geometry: &PageGeometry,
    size: (Pt, Pt),
    x: Pt,
    y: Pt,
    anchor_x: AnchorX,
    anchor_y: AnchorY,
) -> Rect {
    let (width, height) = size;

    let left = match anchor_x {
        AnchorX::Left => x,
        AnchorX::Centre => (geometry.width - width) / 2.0 + x,
        AnchorX::Right => geometry.width - width - x,
    };

    let bottom = match anchor_y {
        AnchorY::Top => geometry.height - height - y,
        AnchorY::Centre => (geometry.height - height) / 2.0 - y,
        AnchorY::Bottom => y,
    };

    Rect::from_origin(left, bottom, width, height)
}
