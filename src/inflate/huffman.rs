//! Canonical Huffman decoding tables (RFC 1951 section 3.2.2).

use super::bit_reader::BitReader;
use crate::error::{Error, Result};

/// Maximum code length in any DEFLATE alphabet.
pub const MAX_BITS: usize = 15;

/// Decoding table for one canonical Huffman code.
///
/// Stores how many codes exist of each length together with the coded
/// symbols ordered by (code length, symbol value). That is enough to decode
/// without materializing codes: within each length the codes are consecutive
/// integers, so a candidate code is valid at length `len` exactly when it is
/// less than `first + count[len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    /// `counts[len]` = number of symbols with code length `len`; `counts[0]` unused.
    counts: [u16; MAX_BITS + 1],
    /// Symbols with nonzero length, sorted by length then value.
    symbols: Vec<u16>,
    /// Longest code length present (0 for an empty table).
    max_len: u8,
}

impl HuffmanTable {
    /// Build a table from code lengths indexed by symbol.
    ///
    /// A length of 0 means the symbol is unused. Over-subscribed length sets
    /// fail with [`Error::InvalidHuffmanCode`]; incomplete sets are accepted
    /// and only fail if an unassigned code is actually read.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut counts = [0u16; MAX_BITS + 1];
        let mut max_len = 0u8;
        for &len in lengths {
            if len as usize > MAX_BITS {
                return Err(Error::InvalidHuffmanCode);
            }
            counts[len as usize] += 1;
            max_len = max_len.max(len);
        }
        counts[0] = 0;

        // Each length doubles the code space; more codes than space means
        // the lengths do not describe a prefix code.
        let mut left: i32 = 1;
        for &count in &counts[1..] {
            left <<= 1;
            left -= count as i32;
            if left < 0 {
                return Err(Error::InvalidHuffmanCode);
            }
        }

        // offsets[len] = index in `symbols` of the first symbol of that length.
        let mut offsets = [0u16; MAX_BITS + 2];
        for len in 1..=MAX_BITS {
            offsets[len + 1] = offsets[len] + counts[len];
        }

        let mut symbols = vec![0u16; offsets[MAX_BITS + 1] as usize];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len != 0 {
                let slot = &mut offsets[len as usize];
                symbols[*slot as usize] = symbol as u16;
                *slot += 1;
            }
        }

        Ok(Self {
            counts,
            symbols,
            max_len,
        })
    }

    /// Decode one symbol, reading the code one bit at a time.
    ///
    /// Huffman codes are packed starting from their most significant bit,
    /// so each bit read extends the candidate code on the right.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u16> {
        let mut code: i32 = 0; // bits read so far
        let mut first: i32 = 0; // first code of the current length
        let mut index: i32 = 0; // index of that first code in `symbols`

        for len in 1..=self.max_len as usize {
            code |= reader.read_bit()? as i32;
            let count = self.counts[len] as i32;
            if code - first < count {
                return Ok(self.symbols[(index + code - first) as usize]);
            }
            index += count;
            first = (first + count) << 1;
            code <<= 1;
        }
        Err(Error::InvalidHuffmanCode)
    }

    /// Number of codes of length `len`.
    pub fn count(&self, len: usize) -> u16 {
        self.counts.get(len).copied().unwrap_or(0)
    }

    /// Coded symbols in canonical order.
    pub fn symbols(&self) -> &[u16] {
        &self.symbols
    }

    /// Longest code length in the table.
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    /// Whether no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
