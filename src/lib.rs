//! # pngflate
//!
//! PNG decoding built on a from-scratch DEFLATE decompressor.
//!
//! The crate is layered bottom-up:
//!
//! - [`inflate`]: bit reader, canonical Huffman tables, sliding window and
//!   the block-level state machine (RFC 1951)
//! - [`zlib`]: the two-byte header and Adler-32 trailer (RFC 1950)
//! - [`png`]: chunk framing, IHDR geometry and scanline defiltering
//!
//! Decoded pixels are returned unaltered: no palette expansion, gamma or
//! color conversion is applied.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pngflate::{decode_png, ColorType};
//!
//! let bytes = std::fs::read("image.png")?;
//! let image = decode_png(&bytes)?;
//! println!("{}x{}", image.width(), image.height());
//! if image.descriptor.color_type == ColorType::Rgba {
//!     let first_row = image.row(0);
//!     println!("{:?}", first_row);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Raw DEFLATE and zlib streams can be decoded directly:
//!
//! ```rust
//! // A stored block holding "hi".
//! let raw = [0x01, 0x02, 0x00, 0xFD, 0xFF, b'h', b'i'];
//! assert_eq!(pngflate::inflate::inflate(&raw).unwrap(), b"hi");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod color;
pub mod error;
pub mod inflate;
pub mod png;
pub mod zlib;

pub use color::ColorType;
pub use error::{Error, Result};
pub use inflate::Inflater;
pub use png::{
    decode_png, decode_png_with_options, ChecksumPolicy, ChunkPolicy, DecodeOptions,
    ImageDescriptor, PngImage,
};
pub use zlib::{decompress, inflate_zlib, Decompressed};
