//! Integrity checksums used by the zlib trailer and PNG chunks.

pub mod adler32;
pub mod crc32;

pub use adler32::{adler32, Adler32};
pub use crc32::{crc32, Crc32};
