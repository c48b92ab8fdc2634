//! Pixel types
//!
//! Monochrome drawing knows three pixel operations. The payload value
//! [`PIXEL_PEN_DEFAULT`] selects whatever the pen currently holds.

/// Payload value meaning "use the pen's default pixel type"
pub const PIXEL_PEN_DEFAULT: u8 = 255;

/// Pixel operation applied by a drawing primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PixelType {
    /// Turn the pixel off
    Clear = 0,
    /// Turn the pixel on
    #[default]
    Set = 1,
    /// Toggle the pixel
    Invert = 2,
}

impl PixelType {
    /// Create a pixel type from its wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PixelType::Clear),
            1 => Some(PixelType::Set),
            2 => Some(PixelType::Invert),
            _ => None,
        }
    }

    /// Get the wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Apply this operation to a pixel that is currently `on`
    pub fn apply(self, on: bool) -> bool {
        match self {
            PixelType::Clear => false,
            PixelType::Set => true,
            PixelType::Invert => !on,
        }
    }

    /// Cycle through Set, Clear and Invert by index
    pub fn cycle(index: u8) -> Self {
        match index % 3 {
            0 => PixelType::Clear,
            1 => PixelType::Set,
            _ => PixelType::Invert,
        }
    }
}

/// Pixel argument of a drawing command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelSelect {
    /// Use the pen's default pixel type
    Pen,
    /// Use this pixel type
    Explicit(PixelType),
}

impl PixelSelect {
    /// Parse the wire value, rejecting unknown pixel types
    pub fn from_u8(value: u8) -> Option<Self> {
        if value == PIXEL_PEN_DEFAULT {
            Some(PixelSelect::Pen)
        } else {
            PixelType::from_u8(value).map(PixelSelect::Explicit)
        }
    }

    /// Get the wire value
    pub fn as_u8(self) -> u8 {
        match self {
            PixelSelect::Pen => PIXEL_PEN_DEFAULT,
            PixelSelect::Explicit(pixel) => pixel.as_u8(),
        }
    }

    /// Resolve against the pen's default pixel type
    pub fn resolve(self, pen_default: PixelType) -> PixelType {
        match self {
            PixelSelect::Pen => pen_default,
            PixelSelect::Explicit(pixel) => pixel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_default_resolves_to_pen() {
        let select = PixelSelect::from_u8(PIXEL_PEN_DEFAULT).unwrap();
        assert_eq!(select, PixelSelect::Pen);
        assert_eq!(select.resolve(PixelType::Invert), PixelType::Invert);
    }

    #[test]
    fn test_explicit_ignores_pen() {
        let select = PixelSelect::from_u8(0).unwrap();
        assert_eq!(select.resolve(PixelType::Set), PixelType::Clear);
    }

    #[test]
    fn test_unknown_pixel_type() {
        assert_eq!(PixelSelect::from_u8(3), None);
        assert_eq!(PixelSelect::from_u8(254), None);
    }

    #[test]
    fn test_apply() {
        assert!(PixelType::Set.apply(false));
        assert!(!PixelType::Clear.apply(true));
        assert!(PixelType::Invert.apply(false));
        assert!(!PixelType::Invert.apply(true));
    }
}
