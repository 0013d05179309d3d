//! zlib container (RFC 1950) around a DEFLATE stream.
//!
//! Layout: 2-byte header (CMF, FLG), raw DEFLATE data, 4-byte big-endian
//! Adler-32 of the uncompressed data.

use crate::checksum::Adler32;
use crate::error::{Error, Result};
use crate::inflate::Inflater;

/// Compression method 8: DEFLATE.
const CM_DEFLATE: u8 = 8;

/// Largest CINFO value (32 KiB window).
const MAX_CINFO: u8 = 7;

/// Preset dictionary flag in FLG.
const FDICT: u8 = 0x20;

/// Parsed zlib header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    /// Base-2 logarithm of the LZ77 window size (8-15).
    pub window_bits: u8,
    /// FLEVEL compression level hint (0-3). Informational only.
    pub level: u8,
}

impl ZlibHeader {
    /// Parse and validate the first two bytes of a zlib stream.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let [cmf, flg] = match data {
            [cmf, flg, ..] => [*cmf, *flg],
            _ => return Err(Error::TruncatedInput),
        };

        let method = cmf & 0x0F;
        if method != CM_DEFLATE {
            return Err(Error::UnsupportedMethod(method));
        }
        let cinfo = cmf >> 4;
        if cinfo > MAX_CINFO {
            return Err(Error::InvalidZlibHeader);
        }
        if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
            return Err(Error::InvalidZlibHeader);
        }
        if flg & FDICT != 0 {
            return Err(Error::Unsupported("zlib preset dictionary"));
        }

        Ok(Self {
            window_bits: cinfo + 8,
            level: flg >> 6,
        })
    }
}

/// Output of a zlib stream together with its checksum comparison.
///
/// A checksum mismatch does not discard the data; callers decide whether
/// to use it via [`Decompressed::verify`] or [`Decompressed::into_verified`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decompressed {
    /// Decompressed bytes.
    pub data: Vec<u8>,
    /// Adler-32 stored in the trailer.
    pub expected_adler: u32,
    /// Adler-32 computed over `data`.
    pub computed_adler: u32,
}

impl Decompressed {
    /// Whether the stored and computed checksums agree.
    pub fn checksum_ok(&self) -> bool {
        self.expected_adler == self.computed_adler
    }

    /// Report a checksum mismatch without giving up the data.
    pub fn verify(&self) -> Result<()> {
        if self.checksum_ok() {
            Ok(())
        } else {
            Err(Error::ChecksumMismatch {
                expected: self.expected_adler,
                actual: self.computed_adler,
            })
        }
    }

    /// Return the data only if the checksum matched.
    pub fn into_verified(self) -> Result<Vec<u8>> {
        self.verify()?;
        Ok(self.data)
    }
}

/// Decompress a zlib stream.
pub fn decompress(data: &[u8]) -> Result<Decompressed> {
    decompress_with_limit(data, None)
}

/// Decompress a zlib stream, failing if it would produce more than
/// `limit` bytes.
pub fn decompress_with_limit(data: &[u8], limit: Option<usize>) -> Result<Decompressed> {
    let header = ZlibHeader::parse(data)?;
    log::debug!(
        "zlib: window 2^{}, level hint {}, {} input bytes",
        header.window_bits,
        header.level,
        data.len()
    );

    let body = &data[2..];
    let mut inflater = match limit {
        Some(limit) => Inflater::with_limit(body, limit),
        None => Inflater::new(body),
    };

    let mut adler = Adler32::new();
    while !inflater.is_done() {
        let before = inflater.output().len();
        inflater.step()?;
        adler.update(&inflater.output()[before..]);
    }

    let trailer = inflater.remaining_input();
    if trailer.len() < 4 {
        return Err(Error::TruncatedInput);
    }
    if trailer.len() > 4 {
        return Err(Error::UnexpectedTrailingData(trailer.len() - 4));
    }
    let expected_adler = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

    Ok(Decompressed {
        data: inflater.into_output(),
        expected_adler,
        computed_adler: adler.finish(),
    })
}

/// Decompress a zlib stream and require a matching checksum.
pub fn inflate_zlib(data: &[u8]) -> Result<Vec<u8>> {
    decompress(data)?.into_verified()
}
