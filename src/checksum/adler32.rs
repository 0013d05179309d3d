//! Adler-32 checksum (RFC 1950) used for zlib trailers.

const MOD_ADLER: u32 = 65_521;

/// Largest n such that 255*n*(n+1)/2 + (n+1)*(MOD_ADLER-1) <= 2^32-1.
const NMAX: usize = 5552;

/// Calculate the Adler-32 checksum of `data`.
#[inline]
#[must_use]
pub fn adler32(data: &[u8]) -> u32 {
    let mut adler = Adler32::new();
    adler.update(data);
    adler.finish()
}

/// Incremental Adler-32, fed as output is produced.
///
/// Modulo reduction is deferred to `NMAX`-byte boundaries, so feeding the
/// data in arbitrary pieces yields the same result as a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    s1: u32,
    s2: u32,
}

impl Adler32 {
    /// Create a checksum in its initial state (value 1).
    pub const fn new() -> Self {
        Self { s1: 1, s2: 0 }
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &b in chunk {
                self.s1 += b as u32;
                self.s2 += self.s1;
            }
            self.s1 %= MOD_ADLER;
            self.s2 %= MOD_ADLER;
        }
    }

    /// Current checksum value.
    #[must_use]
    pub const fn finish(&self) -> u32 {
        (self.s2 << 16) | self.s1
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}
