//! PNG color type definitions.

use crate::error::{Error, Result};

/// Color types a PNG IHDR chunk can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorType {
    /// Grayscale, one sample per pixel.
    Gray = 0,
    /// RGB, three samples per pixel.
    Rgb = 2,
    /// Palette indices, one sample per pixel.
    Indexed = 3,
    /// Grayscale with alpha, two samples per pixel.
    GrayAlpha = 4,
    /// RGBA, four samples per pixel.
    Rgba = 6,
}

impl ColorType {
    /// Returns the number of samples (channels) per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            ColorType::Gray | ColorType::Indexed => 1,
            ColorType::GrayAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }

    /// Returns the IHDR color type value.
    #[inline]
    pub const fn png_value(self) -> u8 {
        self as u8
    }

    /// Whether `bit_depth` is legal for this color type.
    pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
        match self {
            ColorType::Gray => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
            ColorType::Indexed => matches!(bit_depth, 1 | 2 | 4 | 8),
            ColorType::Rgb | ColorType::GrayAlpha | ColorType::Rgba => {
                matches!(bit_depth, 8 | 16)
            }
        }
    }
}

impl TryFrom<u8> for ColorType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ColorType::Gray),
            2 => Ok(ColorType::Rgb),
            3 => Ok(ColorType::Indexed),
            4 => Ok(ColorType::GrayAlpha),
            6 => Ok(ColorType::Rgba),
            _ => Err(Error::InvalidHeader(format!("invalid color type {value}"))),
        }
    }
}
