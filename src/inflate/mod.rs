//! DEFLATE decompression (RFC 1951).
//!
//! [`Inflater`] is an explicit state machine over the block sequence:
//!
//! ```text
//! BlockHeader -> StoredCopy ----------------------> BlockHeader | Done
//!             -> FixedDecode ---------------------> BlockHeader | Done
//!             -> DynamicHeader -> DynamicDecode --> BlockHeader | Done
//! ```
//!
//! Each call to [`Inflater::step`] performs one transition. Output is kept
//! in memory; the [`SlidingWindow`] provides the back-reference history.

pub mod bit_reader;
pub mod huffman;
pub mod window;

use std::sync::LazyLock;

pub use bit_reader::BitReader;
pub use huffman::HuffmanTable;
pub use window::{SlidingWindow, WINDOW_SIZE};

use crate::error::{Error, Result};

/// Length code base values (symbols 257-285).
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Extra bits for length codes.
const LENGTH_EXTRA: [u8; 29] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

/// Distance code base values (symbols 0-29).
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Extra bits for distance codes.
const DISTANCE_EXTRA: [u8; 30] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

/// Order in which code length code lengths are transmitted.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Largest meaningful literal/length and distance alphabets.
const MAX_LITERAL_CODES: usize = 286;
const MAX_DISTANCE_CODES: usize = 30;

const END_OF_BLOCK: u16 = 256;

/// DEFLATE cannot expand input by more than about 1032:1.
const MAX_EXPANSION: usize = 1032;

/// Fixed Huffman tables (RFC 1951 section 3.2.6), built on first use.
static FIXED_TABLES: LazyLock<Result<(HuffmanTable, HuffmanTable)>> = LazyLock::new(|| {
    let mut lengths = [0u8; 288];
    lengths[..144].fill(8);
    lengths[144..256].fill(9);
    lengths[256..280].fill(7);
    lengths[280..].fill(8);
    Ok((
        HuffmanTable::from_lengths(&lengths)?,
        HuffmanTable::from_lengths(&[5u8; 32])?,
    ))
});

fn fixed_tables() -> Result<&'static (HuffmanTable, HuffmanTable)> {
    FIXED_TABLES.as_ref().map_err(Clone::clone)
}

/// Where the decoder is in the block sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// About to read the 3-bit header of the next block.
    BlockHeader,
    /// LEN/NLEN verified; `len` raw bytes follow.
    StoredCopy {
        /// Number of raw bytes in the block.
        len: u16,
    },
    /// Decoding symbols with the fixed tables.
    FixedDecode,
    /// About to read the code length tables of a dynamic block.
    DynamicHeader,
    /// Decoding symbols with tables read from the stream.
    DynamicDecode {
        /// Literal/length table.
        literals: HuffmanTable,
        /// Distance table.
        distances: HuffmanTable,
    },
    /// The final block has ended.
    Done,
    /// A previous step failed; the error is sticky.
    Failed(Error),
}

/// Streaming-in-memory DEFLATE decoder.
pub struct Inflater<'a> {
    reader: BitReader<'a>,
    window: SlidingWindow,
    output: Vec<u8>,
    state: State,
    final_block: bool,
    limit: Option<usize>,
    blocks: usize,
}

impl<'a> Inflater<'a> {
    /// Create a decoder for the raw DEFLATE stream in `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self::build(data, Vec::with_capacity(data.len().saturating_mul(4)), None)
    }

    /// Create a decoder that expects at most `limit` bytes of output.
    ///
    /// The output buffer is pre-allocated to `limit` (capped at what `data`
    /// could expand to), and producing more fails with
    /// [`Error::OutputLimitExceeded`].
    pub fn with_limit(data: &'a [u8], limit: usize) -> Self {
        let capacity = limit.min(data.len().saturating_mul(MAX_EXPANSION));
        Self::build(data, Vec::with_capacity(capacity), Some(limit))
    }

    fn build(data: &'a [u8], output: Vec<u8>, limit: Option<usize>) -> Self {
        Self {
            reader: BitReader::new(data),
            window: SlidingWindow::new(),
            output,
            state: State::BlockHeader,
            final_block: false,
            limit,
            blocks: 0,
        }
    }

    /// Perform one state transition.
    ///
    /// Stepping a finished decoder is a no-op; stepping a failed one
    /// returns the original error again.
    pub fn step(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, State::Done);
        match self.transition(state) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(err) => {
                self.state = State::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Step until the final block has been decoded.
    pub fn run(&mut self) -> Result<()> {
        while !self.is_done() {
            self.step()?;
        }
        Ok(())
    }

    fn transition(&mut self, state: State) -> Result<State> {
        match state {
            State::BlockHeader => self.read_block_header(),
            State::StoredCopy { len } => {
                self.copy_stored(len)?;
                Ok(self.end_of_block())
            }
            State::FixedDecode => {
                let (literals, distances) = fixed_tables()?;
                self.decode_symbols(literals, distances)?;
                Ok(self.end_of_block())
            }
            State::DynamicHeader => {
                let (literals, distances) = self.read_dynamic_tables()?;
                Ok(State::DynamicDecode {
                    literals,
                    distances,
                })
            }
            State::DynamicDecode {
                literals,
                distances,
            } => {
                self.decode_symbols(&literals, &distances)?;
                Ok(self.end_of_block())
            }
            State::Done => Ok(State::Done),
            State::Failed(err) => Err(err),
        }
    }

    fn read_block_header(&mut self) -> Result<State> {
        self.final_block = self.reader.read_bits(1)? == 1;
        let block_type = self.reader.read_bits(2)?;
        self.blocks += 1;

        let next = match block_type {
            0 => {
                self.reader.align_to_byte();
                let len = self.reader.read_u16_le()?;
                let nlen = self.reader.read_u16_le()?;
                if len != !nlen {
                    return Err(Error::CorruptStoredBlock { len, nlen });
                }
                State::StoredCopy { len }
            }
            1 => State::FixedDecode,
            2 => State::DynamicHeader,
            _ => return Err(Error::ReservedBlockType),
        };

        log::debug!(
            "inflate: block {} type {} final={} at byte {}",
            self.blocks,
            block_type,
            self.final_block,
            self.reader.cursor().0
        );
        Ok(next)
    }

    fn end_of_block(&self) -> State {
        log::trace!(
            "inflate: block {} done, {} bytes total",
            self.blocks,
            self.output.len()
        );
        if self.final_block {
            State::Done
        } else {
            State::BlockHeader
        }
    }

    #[inline]
    fn reserve(&self, additional: usize) -> Result<()> {
        match self.limit {
            Some(limit) if self.output.len() + additional > limit => {
                Err(Error::OutputLimitExceeded(limit))
            }
            _ => Ok(()),
        }
    }

    fn copy_stored(&mut self, len: u16) -> Result<()> {
        let len = len as usize;
        self.reserve(len)?;
        let bytes = self.reader.read_slice(len)?;
        self.output.extend_from_slice(bytes);
        self.window.append_slice(bytes);
        Ok(())
    }

    fn read_dynamic_tables(&mut self) -> Result<(HuffmanTable, HuffmanTable)> {
        let hlit = self.reader.read_bits(5)? as usize + 257;
        let hdist = self.reader.read_bits(5)? as usize + 1;
        let hclen = self.reader.read_bits(4)? as usize + 4;
        if hlit > MAX_LITERAL_CODES || hdist > MAX_DISTANCE_CODES {
            return Err(Error::InvalidCodeLengths(
                "too many length or distance codes",
            ));
        }

        let mut code_length_lengths = [0u8; 19];
        for &symbol in &CODE_LENGTH_ORDER[..hclen] {
            code_length_lengths[symbol] = self.reader.read_bits(3)? as u8;
        }
        let code_lengths = HuffmanTable::from_lengths(&code_length_lengths)?;

        let total = hlit + hdist;
        let mut lengths = [0u8; MAX_LITERAL_CODES + MAX_DISTANCE_CODES];
        let mut i = 0;
        while i < total {
            let (value, repeat) = match code_lengths.decode(&mut self.reader)? {
                symbol @ 0..=15 => (symbol as u8, 1),
                16 => {
                    if i == 0 {
                        return Err(Error::InvalidCodeLengths(
                            "repeat code with no previous length",
                        ));
                    }
                    (lengths[i - 1], 3 + self.reader.read_bits(2)? as usize)
                }
                17 => (0, 3 + self.reader.read_bits(3)? as usize),
                18 => (0, 11 + self.reader.read_bits(7)? as usize),
                _ => return Err(Error::InvalidHuffmanCode),
            };
            if i + repeat > total {
                return Err(Error::InvalidCodeLengths(
                    "repeat overruns the code length count",
                ));
            }
            lengths[i..i + repeat].fill(value);
            i += repeat;
        }

        if lengths[END_OF_BLOCK as usize] == 0 {
            return Err(Error::InvalidCodeLengths("missing end-of-block code"));
        }

        let literals = HuffmanTable::from_lengths(&lengths[..hlit])?;
        let distances = HuffmanTable::from_lengths(&lengths[hlit..total])?;
        Ok((literals, distances))
    }

    fn decode_symbols(&mut self, literals: &HuffmanTable, distances: &HuffmanTable) -> Result<()> {
        loop {
            let symbol = literals.decode(&mut self.reader)?;
            match symbol {
                0..=255 => {
                    self.reserve(1)?;
                    self.output.push(symbol as u8);
                    self.window.append(symbol as u8);
                }
                END_OF_BLOCK => return Ok(()),
                257..=285 => {
                    let len_idx = (symbol - 257) as usize;
                    let length = LENGTH_BASE[len_idx] as usize
                        + self.reader.read_bits(LENGTH_EXTRA[len_idx])? as usize;

                    let dist_symbol = distances.decode(&mut self.reader)?;
                    if dist_symbol as usize >= MAX_DISTANCE_CODES {
                        return Err(Error::ReservedSymbol(dist_symbol));
                    }
                    let dist_idx = dist_symbol as usize;
                    let distance = DISTANCE_BASE[dist_idx] as usize
                        + self.reader.read_bits(DISTANCE_EXTRA[dist_idx])? as usize;

                    self.reserve(length)?;
                    self.window.copy(distance, length, &mut self.output)?;
                }
                _ => return Err(Error::ReservedSymbol(symbol)),
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Whether the final block has been fully decoded.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Number of block headers read so far.
    pub fn blocks_decoded(&self) -> usize {
        self.blocks
    }

    /// Output produced so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Input after the byte holding the last consumed bit.
    pub fn remaining_input(&self) -> &'a [u8] {
        self.reader.rest()
    }

    /// Consume the decoder and return its output.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }
}

/// Inflate a raw DEFLATE stream that must end exactly at its final block.
///
/// Fails with [`Error::UnexpectedTrailingData`] if whole bytes follow it.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Inflater::new(data);
    inflater.run()?;
    let trailing = inflater.reader.remaining_bytes();
    if trailing > 0 {
        return Err(Error::UnexpectedTrailingData(trailing));
    }
    Ok(inflater.into_output())
}
