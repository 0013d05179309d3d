//! CRC-32 (ISO-HDLC, reflected polynomial 0xEDB88320) as used by PNG chunks.

/// Byte-at-a-time lookup table, built on first use.
static CRC_TABLE: std::sync::LazyLock<[u32; 256]> = std::sync::LazyLock::new(|| {
    let mut table = [0u32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        let mut crc = i as u32;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
        *entry = crc;
    }
    table
});

/// Calculate the CRC-32 of `data`.
#[inline]
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}

/// CRC of a PNG chunk, covering the type bytes followed by the data.
#[must_use]
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(data);
    crc.finalize()
}

/// Incremental CRC-32.
#[derive(Debug, Clone)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    /// Create a new CRC-32 calculator.
    pub fn new() -> Self {
        Self { crc: 0xFFFF_FFFF }
    }

    /// Feed more data.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let table = &*CRC_TABLE;
        for &byte in data {
            let index = ((self.crc ^ byte as u32) & 0xFF) as usize;
            self.crc = (self.crc >> 8) ^ table[index];
        }
    }

    /// Finish and return the CRC value.
    #[inline]
    pub fn finalize(self) -> u32 {
        self.crc ^ 0xFFFF_FFFF
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
