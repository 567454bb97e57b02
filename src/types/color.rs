//! Color representation for decoded point data

use std::fmt;

/// An 8-bit RGB color attached to a decoded point.
///
/// LAS files store 16-bit color channels; decoders narrow them to 8 bits
/// before building renderable output (see [`Rgb::from_u16_channels`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Narrow the 16-bit channels of a LAS color record to 8 bits
    /// (upper byte of each channel).
    pub fn from_u16_channels(r: u16, g: u16, b: u16) -> Self {
        Rgb {
            r: (r >> 8) as u8,
            g: (g >> 8) as u8,
            b: (b >> 8) as u8,
        }
    }

    /// A gray level from a normalized [0, 1] value.
    pub fn gray(level: f64) -> Self {
        let v = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb { r: v, g: v, b: v }
    }

    /// Channels normalized to [0, 1], for vertex-color buffers.
    pub fn normalized(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGB({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u16_channels() {
        let c = Rgb::from_u16_channels(0xFF00, 0x8000, 0x0100);
        assert_eq!(c, Rgb::new(0xFF, 0x80, 0x01));
    }

    #[test]
    fn test_gray_clamps() {
        assert_eq!(Rgb::gray(2.0), Rgb::WHITE);
        assert_eq!(Rgb::gray(-1.0), Rgb::BLACK);
        assert_eq!(Rgb::gray(0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_normalized() {
        let n = Rgb::new(255, 0, 51).normalized();
        assert_eq!(n[0], 1.0);
        assert_eq!(n[1], 0.0);
        assert!((n[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "RGB(1, 2, 3)");
    }
}
