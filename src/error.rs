//! Error types for the pngflate library.

use std::fmt;

/// Result type alias for pngflate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a zlib stream or a PNG image.
///
/// Every error is terminal for the decode attempt that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input ended before the decoder had read everything it needed.
    TruncatedInput,
    /// A bit sequence did not match any code in the active Huffman table,
    /// or a set of code lengths was over-subscribed.
    InvalidHuffmanCode,
    /// A back-reference pointed before the start of the output or beyond
    /// the window.
    InvalidDistance {
        /// Distance requested by the back-reference.
        distance: usize,
        /// Bytes of history available at that point.
        available: usize,
    },
    /// A stored block's LEN and NLEN fields were not one's complements.
    CorruptStoredBlock {
        /// LEN field.
        len: u16,
        /// NLEN field.
        nlen: u16,
    },
    /// A literal/length symbol of 286-287 or a distance symbol of 30-31.
    ReservedSymbol(u16),
    /// Block type 3, which RFC 1951 reserves.
    ReservedBlockType,
    /// The code-length sequence of a dynamic block is malformed.
    InvalidCodeLengths(&'static str),
    /// The zlib compression method is not DEFLATE (8).
    UnsupportedMethod(u8),
    /// The zlib header failed its FCHECK test or declared a window over 32 KiB.
    InvalidZlibHeader,
    /// The stored Adler-32 does not match the decompressed data.
    ChecksumMismatch {
        /// Checksum stored in the zlib trailer.
        expected: u32,
        /// Checksum computed over the produced output.
        actual: u32,
    },
    /// Whole bytes remained after the end of the compressed stream.
    UnexpectedTrailingData(usize),
    /// The decompressed output grew past the configured limit.
    OutputLimitExceeded(usize),
    /// A valid but unsupported feature (preset dictionary, interlacing).
    Unsupported(&'static str),
    /// The input does not start with the PNG signature.
    NotAPng,
    /// A required chunk was absent.
    MissingChunk(&'static str),
    /// A chunk was rejected by the configured chunk policy.
    UnknownChunk([u8; 4]),
    /// A chunk's stored CRC does not match its contents.
    CrcMismatch {
        /// Chunk type.
        chunk: [u8; 4],
        /// CRC stored after the chunk data.
        expected: u32,
        /// CRC computed over type and data.
        actual: u32,
    },
    /// IHDR contents are illegal.
    InvalidHeader(String),
    /// Zero width or height.
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Image dimensions exceed the supported maximum.
    ImageTooLarge {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Maximum supported dimension or pixel count.
        max: u64,
    },
    /// A PLTE chunk of illegal length.
    InvalidPalette(usize),
    /// The decompressed scanline data has the wrong size.
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        actual: usize,
    },
    /// A scanline began with a filter byte outside 0-4.
    InvalidFilterType(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TruncatedInput => write!(f, "Unexpected end of input"),
            Error::InvalidHuffmanCode => write!(f, "Invalid Huffman code"),
            Error::InvalidDistance {
                distance,
                available,
            } => {
                write!(
                    f,
                    "Invalid back-reference distance {} ({} bytes of history)",
                    distance, available
                )
            }
            Error::CorruptStoredBlock { len, nlen } => {
                write!(
                    f,
                    "Corrupt stored block: LEN {:#06X} does not match NLEN {:#06X}",
                    len, nlen
                )
            }
            Error::ReservedSymbol(symbol) => write!(f, "Reserved symbol {}", symbol),
            Error::ReservedBlockType => write!(f, "Reserved block type 3"),
            Error::InvalidCodeLengths(msg) => write!(f, "Invalid code lengths: {}", msg),
            Error::UnsupportedMethod(method) => {
                write!(f, "Unsupported compression method {}", method)
            }
            Error::InvalidZlibHeader => write!(f, "Invalid zlib header"),
            Error::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "Adler-32 mismatch: expected {:08X}, got {:08X}",
                    expected, actual
                )
            }
            Error::UnexpectedTrailingData(count) => {
                write!(f, "{} unexpected bytes after end of stream", count)
            }
            Error::OutputLimitExceeded(limit) => {
                write!(f, "Decompressed output exceeds limit of {} bytes", limit)
            }
            Error::Unsupported(what) => write!(f, "Unsupported: {}", what),
            Error::NotAPng => write!(f, "Not a PNG file"),
            Error::MissingChunk(name) => write!(f, "Missing {} chunk", name),
            Error::UnknownChunk(kind) => {
                write!(f, "Unknown chunk {}", String::from_utf8_lossy(kind))
            }
            Error::CrcMismatch {
                chunk,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "CRC mismatch in {} chunk: expected {:08X}, got {:08X}",
                    String::from_utf8_lossy(chunk),
                    expected,
                    actual
                )
            }
            Error::InvalidHeader(msg) => write!(f, "Invalid IHDR: {}", msg),
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::ImageTooLarge { width, height, max } => {
                write!(f, "Image {}x{} exceeds maximum {}", width, height, max)
            }
            Error::InvalidPalette(len) => write!(f, "Invalid PLTE length {}", len),
            Error::InvalidDataLength { expected, actual } => {
                write!(
                    f,
                    "Invalid scanline data length: expected {} bytes, got {}",
                    expected, actual
                )
            }
            Error::InvalidFilterType(filter) => write!(f, "Invalid filter type {}", filter),
        }
    }
}

impl std::error::Error for Error {}
