use crate::margins::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;

/// The fixed geometry every page of a document shares: the page size and the
/// margins flowed content must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub margins: Margins,
}

impl PageGeometry {
    pub fn new(size: PageSize, margins: Margins) -> PageGeometry {
        PageGeometry {
            width: size.0,
            height: size.1,
            margins,
        }
    }

    /// Horizontal space available to flowed content
    pub fn content_width(&self) -> Pt {
        self.width - self.margins.left - self.margins.right
    }

    /// Vertical space available to flowed content on an empty page. Negative
    /// when the margins alone exceed the page height.
    pub fn content_height(&self) -> Pt {
        self.height - self.margins.top - self.margins.bottom
    }

    /// The region flowed content is laid out in, in page coordinates
    /// (origin at the lower-left corner, y increasing upward)
    pub fn content_box(&self) -> Rect {
        Rect {
            x1: self.margins.left,
            y1: self.margins.bottom,
            x2: self.width - self.margins.right,
            y2: self.height - self.margins.top,
        }
    }
}

/// Tracks how much vertical space content has consumed on the current page,
/// measured from the top margin downward, and answers page-break questions.
///
/// The cursor never decreases except through [FlowCursor::reset], which
/// happens exactly once per page finalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCursor {
    used: Pt,
    capacity: Pt,
}

impl FlowCursor {
    pub fn new(geometry: &PageGeometry) -> FlowCursor {
        FlowCursor {
            used: Pt::ZERO,
            capacity: geometry.content_height(),
        }
    }

    /// Height consumed on the current page so far
    pub fn used(&self) -> Pt {
        self.used
    }

    /// True when nothing has been placed on the current page yet
    pub fn at_top(&self) -> bool {
        self.used == Pt::ZERO
    }

    /// Would placing a block of `extra` height exceed the page capacity?
    /// An exactly-full page is not an overflow; call with `Pt::ZERO` to ask
    /// whether the page has any room at all (true only when the margins
    /// alone exceed the page height, or space was over-reserved).
    pub fn would_overflow(&self, extra: Pt) -> bool {
        self.used + extra > self.capacity
    }

    /// Consume `extra` height on the current page. There is no upper clamp;
    /// callers are expected to check [FlowCursor::would_overflow] first.
    /// Zero or negative heights reserve nothing.
    pub fn reserve(&mut self, extra: Pt) {
        if extra > Pt::ZERO {
            self.used += extra;
        }
    }

    /// Return to the top of a fresh page
    pub fn reset(&mut self) {
        self.used = Pt::ZERO;
    }
}
