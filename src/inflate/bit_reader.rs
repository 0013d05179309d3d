//! LSB-first bit reader for DEFLATE streams.

use crate::error::{Error, Result};

/// Reads bits from a byte slice in DEFLATE order: the least significant bit
/// of each byte comes first.
///
/// The cursor is a (byte index, bit index) pair; the bit index is always in
/// `0..8` and carries into the byte index when it reaches 8.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader positioned at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            bit: 0,
        }
    }

    /// Number of unread bits.
    #[inline]
    pub fn bits_remaining(&self) -> usize {
        (self.data.len() - self.pos) * 8 - self.bit as usize
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u32> {
        let byte = *self.data.get(self.pos).ok_or(Error::TruncatedInput)?;
        let value = (byte >> self.bit) & 1;
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Ok(value as u32)
    }

    /// Read `n` bits (0..=32) as an unsigned integer, first bit in the LSB.
    ///
    /// Nothing is consumed when fewer than `n` bits remain.
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);
        if n as usize > self.bits_remaining() {
            return Err(Error::TruncatedInput);
        }

        let mut value = 0u32;
        let mut filled = 0u8;
        while filled < n {
            let available = 8 - self.bit;
            let take = available.min(n - filled);
            let bits = (self.data[self.pos] >> self.bit) as u32 & ((1u32 << take) - 1);
            value |= bits << filled;
            filled += take;
            self.bit += take;
            if self.bit == 8 {
                self.bit = 0;
                self.pos += 1;
            }
        }
        Ok(value)
    }

    /// Discard the rest of a partially consumed byte.
    pub fn align_to_byte(&mut self) {
        if self.bit != 0 {
            self.bit = 0;
            self.pos += 1;
        }
    }

    /// Whether the cursor sits on a byte boundary.
    #[inline]
    pub fn is_byte_aligned(&self) -> bool {
        self.bit == 0
    }

    /// Read a little-endian `u16` (must be byte-aligned).
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Borrow the next `len` whole bytes (must be byte-aligned).
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        debug_assert!(self.is_byte_aligned());
        let end = self.pos.checked_add(len).ok_or(Error::TruncatedInput)?;
        let slice = self.data.get(self.pos..end).ok_or(Error::TruncatedInput)?;
        self.pos = end;
        Ok(slice)
    }

    /// Current cursor as (byte index, bit index).
    #[inline]
    pub fn cursor(&self) -> (usize, u8) {
        (self.pos, self.bit)
    }

    /// Whole bytes not yet touched by the cursor.
    #[inline]
    pub fn remaining_bytes(&self) -> usize {
        self.data.len() - self.pos - usize::from(self.bit != 0)
    }

    /// Remaining input from the next whole byte onwards.
    pub fn rest(&self) -> &'a [u8] {
        let start = (self.pos + usize::from(self.bit != 0)).min(self.data.len());
        &self.data[start..]
    }
}
