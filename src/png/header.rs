//! IHDR parsing and scanline geometry.

use crate::color::ColorType;
use crate::error::{Error, Result};

/// Maximum dimension for decoded images (16 million pixels per side).
pub const MAX_DIMENSION: u32 = 1 << 24;

/// Length of the IHDR chunk payload.
pub const IHDR_LEN: usize = 13;

/// Image metadata from the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per sample.
    pub bit_depth: u8,
    /// Color type.
    pub color_type: ColorType,
    /// Adam7 interlacing flag.
    pub interlaced: bool,
}

impl ImageDescriptor {
    /// Parse and validate an IHDR payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != IHDR_LEN {
            return Err(Error::InvalidHeader(format!(
                "IHDR length {} (expected {IHDR_LEN})",
                data.len()
            )));
        }

        let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let bit_depth = data[8];
        let color_type = ColorType::try_from(data[9])?;
        let compression_method = data[10];
        let filter_method = data[11];
        let interlace_method = data[12];

        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::ImageTooLarge {
                width,
                height,
                max: MAX_DIMENSION as u64,
            });
        }
        if !color_type.allows_bit_depth(bit_depth) {
            return Err(Error::InvalidHeader(format!(
                "bit depth {bit_depth} not allowed for {color_type:?}"
            )));
        }
        if compression_method != 0 {
            return Err(Error::InvalidHeader(format!(
                "compression method {compression_method}"
            )));
        }
        if filter_method != 0 {
            return Err(Error::InvalidHeader(format!("filter method {filter_method}")));
        }
        let interlaced = match interlace_method {
            0 => false,
            1 => true,
            other => {
                return Err(Error::InvalidHeader(format!("interlace method {other}")));
            }
        };

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            interlaced,
        })
    }

    /// Bits occupied by one pixel.
    #[inline]
    pub fn bits_per_pixel(&self) -> usize {
        self.color_type.channels() * self.bit_depth as usize
    }

    /// Byte distance used by the Sub/Average/Paeth filters to find the
    /// corresponding byte of the previous pixel (at least 1).
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel() / 8).max(1)
    }

    /// Bytes in one unfiltered scanline.
    #[inline]
    pub fn stride(&self) -> usize {
        (self.width as usize * self.bits_per_pixel()).div_ceil(8)
    }

    /// Bytes of raw pixel data: `height * stride`.
    pub fn raw_size(&self) -> Result<usize> {
        self.stride()
            .checked_mul(self.height as usize)
            .ok_or(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: usize::MAX as u64,
            })
    }

    /// Bytes of filtered scanline data: `height * (1 + stride)`.
    pub fn filtered_size(&self) -> Result<usize> {
        (self.stride() + 1)
            .checked_mul(self.height as usize)
            .ok_or(Error::ImageTooLarge {
                width: self.width,
                height: self.height,
                max: usize::MAX as u64,
            })
    }

    /// Total pixel count.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
