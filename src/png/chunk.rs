//! PNG chunk framing.
//!
//! A PNG file is the 8-byte signature followed by chunks of the form
//! (4-byte big-endian length, 4-byte type, data, 4-byte CRC over type and
//! data).

use super::header::ImageDescriptor;
use super::ChunkPolicy;
use crate::checksum::crc32::chunk_crc;
use crate::color::ColorType;
use crate::error::{Error, Result};

/// PNG file signature (magic bytes).
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Length, type and CRC fields around each chunk's data.
const CHUNK_OVERHEAD: usize = 12;

/// One chunk borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Four-letter chunk type.
    pub chunk_type: [u8; 4],
    /// Chunk payload.
    pub data: &'a [u8],
    /// CRC stored after the payload.
    pub crc: u32,
}

impl Chunk<'_> {
    /// Critical chunks have an uppercase first letter (ancillary bit clear).
    pub fn is_critical(&self) -> bool {
        self.chunk_type[0] & 0x20 == 0
    }

    /// Compare the stored CRC with one computed over type and data.
    pub fn verify_crc(&self) -> Result<()> {
        let actual = chunk_crc(&self.chunk_type, self.data);
        if actual == self.crc {
            Ok(())
        } else {
            Err(Error::CrcMismatch {
                chunk: self.chunk_type,
                expected: self.crc,
                actual,
            })
        }
    }

    /// Chunk type as text, for logging.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }
}

/// Iterator over the chunks of a PNG file, ending after IEND.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    finished: bool,
}

impl<'a> ChunkReader<'a> {
    /// Check the signature and position the reader at the first chunk.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
            return Err(Error::NotAPng);
        }
        Ok(Self {
            data,
            pos: PNG_SIGNATURE.len(),
            finished: false,
        })
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let rest = &self.data[self.pos..];
        if rest.len() < CHUNK_OVERHEAD {
            return Err(Error::TruncatedInput);
        }
        let length = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let chunk_type = [rest[4], rest[5], rest[6], rest[7]];
        let data_end = 8usize
            .checked_add(length)
            .filter(|&end| end + 4 <= rest.len())
            .ok_or(Error::TruncatedInput)?;
        let data = &rest[8..data_end];
        let crc = u32::from_be_bytes([
            rest[data_end],
            rest[data_end + 1],
            rest[data_end + 2],
            rest[data_end + 3],
        ]);

        self.pos += data_end + 4;
        Ok(Chunk {
            chunk_type,
            data,
            crc,
        })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.pos == self.data.len() {
            self.finished = true;
            return None;
        }
        match self.read_chunk() {
            Ok(chunk) => {
                if &chunk.chunk_type == b"IEND" {
                    self.finished = true;
                }
                Some(Ok(chunk))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// The chunks the decoder needs, gathered from a PNG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngChunks {
    /// Parsed IHDR.
    pub header: ImageDescriptor,
    /// PLTE entries, unaltered.
    pub palette: Option<Vec<[u8; 3]>>,
    /// Concatenated IDAT payloads in file order.
    pub idat: Vec<u8>,
    /// Number of IDAT chunks seen.
    pub idat_chunks: usize,
}

/// Walk the chunk sequence, locating IHDR, PLTE, every IDAT and IEND.
///
/// Unknown chunks are handled according to `policy`. When `verify_crc` is
/// set every chunk's CRC is checked, including skipped ones.
pub fn read_chunks(data: &[u8], policy: ChunkPolicy, verify_crc: bool) -> Result<PngChunks> {
    let mut header: Option<ImageDescriptor> = None;
    let mut palette: Option<Vec<[u8; 3]>> = None;
    let mut idat = Vec::new();
    let mut idat_chunks = 0usize;
    let mut last_was_idat = false;
    let mut seen_iend = false;

    for chunk in ChunkReader::new(data)? {
        let chunk = chunk?;
        if verify_crc {
            chunk.verify_crc()?;
        }

        let is_idat = &chunk.chunk_type == b"IDAT";
        match &chunk.chunk_type {
            b"IHDR" => {
                if header.is_some() {
                    return Err(Error::InvalidHeader("duplicate IHDR chunk".into()));
                }
                header = Some(ImageDescriptor::parse(chunk.data)?);
            }
            _ if header.is_none() => return Err(Error::MissingChunk("IHDR")),
            b"PLTE" => {
                let len = chunk.data.len();
                if len == 0 || len % 3 != 0 || len / 3 > 256 {
                    return Err(Error::InvalidPalette(len));
                }
                palette = Some(
                    chunk
                        .data
                        .chunks_exact(3)
                        .map(|rgb| [rgb[0], rgb[1], rgb[2]])
                        .collect(),
                );
            }
            b"IDAT" => {
                if idat_chunks > 0 && !last_was_idat {
                    log::warn!("png: IDAT chunks are not consecutive");
                }
                idat.extend_from_slice(chunk.data);
                idat_chunks += 1;
            }
            b"IEND" => {
                if !chunk.data.is_empty() {
                    log::warn!("png: IEND chunk carries {} bytes of data", chunk.data.len());
                }
                seen_iend = true;
            }
            _ => match policy {
                ChunkPolicy::Strict => return Err(Error::UnknownChunk(chunk.chunk_type)),
                ChunkPolicy::RejectUnknownCritical if chunk.is_critical() => {
                    return Err(Error::UnknownChunk(chunk.chunk_type));
                }
                _ => log::debug!(
                    "png: skipping {} chunk ({} bytes)",
                    chunk.name(),
                    chunk.data.len()
                ),
            },
        }
        last_was_idat = is_idat;
    }

    let header = header.ok_or(Error::MissingChunk("IHDR"))?;
    if !seen_iend {
        return Err(Error::MissingChunk("IEND"));
    }
    if idat_chunks == 0 {
        return Err(Error::MissingChunk("IDAT"));
    }
    if header.color_type == ColorType::Indexed && palette.is_none() {
        return Err(Error::MissingChunk("PLTE"));
    }

    log::debug!(
        "png: {}x{} {:?} depth {}, {} IDAT chunks ({} bytes)",
        header.width,
        header.height,
        header.color_type,
        header.bit_depth,
        idat_chunks,
        idat.len()
    );

    Ok(PngChunks {
        header,
        palette,
        idat,
        idat_chunks,
    })
}
