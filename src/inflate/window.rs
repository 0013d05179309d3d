//! 32 KiB sliding history window for LZ77 back-references.

use crate::error::{Error, Result};

/// Window capacity mandated by RFC 1951.
pub const WINDOW_SIZE: usize = 32 * 1024;

const WINDOW_MASK: usize = WINDOW_SIZE - 1;

/// Ring buffer holding the most recently produced output bytes.
///
/// Bytes are addressed by a monotonically increasing logical position; the
/// physical slot is that position modulo [`WINDOW_SIZE`].
pub struct SlidingWindow {
    buffer: Box<[u8]>,
    /// Logical position of the next byte to be written.
    total: usize,
}

impl SlidingWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self {
            buffer: vec![0u8; WINDOW_SIZE].into_boxed_slice(),
            total: 0,
        }
    }

    /// Store one byte at the write head.
    #[inline]
    pub fn append(&mut self, byte: u8) {
        self.buffer[self.total & WINDOW_MASK] = byte;
        self.total += 1;
    }

    /// Store a run of bytes, e.g. a stored block.
    pub fn append_slice(&mut self, bytes: &[u8]) {
        // Only the last WINDOW_SIZE bytes can ever be referenced.
        let skip = bytes.len().saturating_sub(WINDOW_SIZE);
        self.total += skip;
        for &b in &bytes[skip..] {
            self.append(b);
        }
    }

    /// Append `length` bytes, each equal to the byte `distance` positions
    /// behind the write head, and mirror them into `output`.
    ///
    /// The copy may overlap its own output: with `distance < length` the
    /// bytes appended early in the call are read again later in the call.
    pub fn copy(&mut self, distance: usize, length: usize, output: &mut Vec<u8>) -> Result<()> {
        let available = self.available();
        if distance == 0 || distance > available {
            return Err(Error::InvalidDistance {
                distance,
                available,
            });
        }

        output.reserve(length);
        let mut src = self.total - distance;
        for _ in 0..length {
            let byte = self.buffer[src & WINDOW_MASK];
            self.append(byte);
            output.push(byte);
            src += 1;
        }
        Ok(())
    }

    /// Bytes of history that may be referenced.
    #[inline]
    pub fn available(&self) -> usize {
        self.total.min(WINDOW_SIZE)
    }

    /// Total bytes ever written.
    #[inline]
    pub fn total_written(&self) -> usize {
        self.total
    }

    /// The referenceable history, oldest byte first.
    pub fn history(&self) -> Vec<u8> {
        let start = self.total - self.available();
        (start..self.total)
            .map(|pos| self.buffer[pos & WINDOW_MASK])
            .collect()
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}
