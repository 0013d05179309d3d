//! PNG decoding pipeline.
//!
//! Chunks are located, the concatenated IDAT stream is decompressed through
//! the zlib container, and the scanlines are defiltered into raw pixel bytes.
//! Samples are returned unaltered: 16-bit samples stay big-endian, sub-byte
//! samples stay packed and palette indices are not expanded.

pub mod chunk;
pub mod filter;
pub mod header;

pub use chunk::{Chunk, ChunkReader, PngChunks, PNG_SIGNATURE};
pub use filter::FilterType;
pub use header::ImageDescriptor;

use crate::error::{Error, Result};
use crate::zlib;

/// Handling of chunks other than IHDR, PLTE, IDAT and IEND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkPolicy {
    /// Skip every unknown chunk.
    #[default]
    Skip,
    /// Skip unknown ancillary chunks, reject unknown critical chunks.
    RejectUnknownCritical,
    /// Reject every unknown chunk.
    Strict,
}

/// Handling of an Adler-32 mismatch on the IDAT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Fail with [`Error::ChecksumMismatch`].
    #[default]
    Reject,
    /// Log a warning and return the image with `checksum_ok` cleared.
    Warn,
}

/// PNG decoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Unknown chunk handling.
    pub chunk_policy: ChunkPolicy,
    /// Verify every chunk's CRC-32 (off by default).
    pub verify_crc: bool,
    /// Adler-32 mismatch handling.
    pub checksum_policy: ChecksumPolicy,
    /// Upper bound on `width * height`, if any.
    pub max_pixels: Option<u64>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            chunk_policy: ChunkPolicy::Skip,
            verify_crc: false,
            checksum_policy: ChecksumPolicy::Reject,
            max_pixels: None,
        }
    }
}

impl DecodeOptions {
    /// Reject unknown chunks and check every CRC.
    pub fn strict() -> Self {
        Self {
            chunk_policy: ChunkPolicy::Strict,
            verify_crc: true,
            checksum_policy: ChecksumPolicy::Reject,
            max_pixels: None,
        }
    }

    /// Limit decoded images to `max_pixels` pixels.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = Some(max_pixels);
        self
    }
}

/// A decoded PNG image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    /// Image metadata from IHDR.
    pub descriptor: ImageDescriptor,
    /// Raw pixel bytes, `height * stride` long, row-major.
    pub pixels: Vec<u8>,
    /// PLTE entries, if the file had one.
    pub palette: Option<Vec<[u8; 3]>>,
    /// Whether the IDAT stream's Adler-32 matched.
    pub checksum_ok: bool,
}

impl PngImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Bytes per raw scanline.
    pub fn stride(&self) -> usize {
        self.descriptor.stride()
    }

    /// Raw bytes of scanline `y`, if in range.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        let stride = self.stride();
        let start = (y as usize).checked_mul(stride)?;
        self.pixels.get(start..start + stride)
    }
}

/// Decode a PNG file with default options.
pub fn decode_png(data: &[u8]) -> Result<PngImage> {
    decode_png_with_options(data, &DecodeOptions::default())
}

/// Decode a PNG file.
pub fn decode_png_with_options(data: &[u8], options: &DecodeOptions) -> Result<PngImage> {
    let PngChunks {
        header,
        palette,
        idat,
        ..
    } = chunk::read_chunks(data, options.chunk_policy, options.verify_crc)?;

    if let Some(max) = options.max_pixels {
        if header.pixel_count() > max {
            return Err(Error::ImageTooLarge {
                width: header.width,
                height: header.height,
                max,
            });
        }
    }
    if header.interlaced {
        return Err(Error::Unsupported("Adam7 interlacing"));
    }

    let raw_size = header.raw_size()?;
    let expected = header.filtered_size()?;
    log::debug!(
        "png: expecting {} filtered bytes, {} raw bytes",
        expected,
        raw_size
    );
    let decompressed = zlib::decompress_with_limit(&idat, Some(expected))?;
    let checksum_ok = decompressed.checksum_ok();
    if !checksum_ok {
        match options.checksum_policy {
            ChecksumPolicy::Reject => decompressed.verify()?,
            ChecksumPolicy::Warn => log::warn!(
                "png: IDAT Adler-32 mismatch (stored {:08X}, computed {:08X}); using data anyway",
                decompressed.expected_adler,
                decompressed.computed_adler
            ),
        }
    }

    let pixels = filter::unfilter_scanlines(
        &decompressed.data,
        header.stride(),
        header.height as usize,
        header.bytes_per_pixel(),
    )?;

    Ok(PngImage {
        descriptor: header,
        pixels,
        palette,
        checksum_ok,
    })
}
