/// A colour in the DeviceRGB space; r, g, and b range from 0.0 to 1.0
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    /// Create a new colour. r, g, and b range from 0.0 to 1.0
    pub fn new(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b }
    }

    /// Create a new colour. r, g, and b range from 0 to 255
    pub fn new_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a greyscale colour; g ranges from 0.0 (black) to 1.0 (white)
    pub fn grey(g: f32) -> Colour {
        Colour { r: g, g, b: g }
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

impl<T: Into<f32>> From<[T; 3]> for Colour {
    fn from(c: [T; 3]) -> Self {
        let [r, g, b] = c;
        Colour {
            r: r.into(),
            g: g.into(),
            b: b.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Colour = Colour {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
    pub const GREY: Colour = Colour {
        r: 0.5,
        g: 0.5,
        b: 0.5,
    };
    pub const RED: Colour = Colour {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}
