//! PNG scanline reconstruction (inverse filtering).
//!
//! Each encoded scanline is one filter-type byte followed by `stride`
//! filtered bytes. Reconstruction computes `raw[x] = filtered[x] + predictor`
//! modulo 256, where the predictor draws on already-reconstructed bytes to
//! the left (`bpp` bytes back) and in the previous row.

use crate::error::{Error, Result};

/// Per-scanline filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterType {
    /// Predictor 0.
    None = 0,
    /// Predictor is the byte `bpp` to the left.
    Sub = 1,
    /// Predictor is the byte above.
    Up = 2,
    /// Predictor is the floored mean of left and above.
    Average = 3,
    /// Predictor is the Paeth choice among left, above and upper-left.
    Paeth = 4,
}

impl TryFrom<u8> for FilterType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(FilterType::None),
            1 => Ok(FilterType::Sub),
            2 => Ok(FilterType::Up),
            3 => Ok(FilterType::Average),
            4 => Ok(FilterType::Paeth),
            _ => Err(Error::InvalidFilterType(value)),
        }
    }
}

/// Reconstruct all scanlines, row 0 first.
///
/// `data` must hold exactly `height * (1 + stride)` bytes. Returns
/// `height * stride` raw bytes.
pub fn unfilter_scanlines(data: &[u8], stride: usize, height: usize, bpp: usize) -> Result<Vec<u8>> {
    let expected = (stride + 1) * height;
    if data.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }

    let mut raw = vec![0u8; stride * height];
    let zero_row = vec![0u8; stride];

    for (y, encoded) in data.chunks_exact(stride + 1).enumerate() {
        let filter = FilterType::try_from(encoded[0])?;
        let (done, rest) = raw.split_at_mut(y * stride);
        let prev = if y == 0 {
            &zero_row[..]
        } else {
            &done[(y - 1) * stride..]
        };
        let row = &mut rest[..stride];
        row.copy_from_slice(&encoded[1..]);
        unfilter_row(filter, row, prev, bpp);
    }

    Ok(raw)
}

/// Reconstruct one row in place. `prev` is the reconstructed previous row
/// (all zeros for the first row).
pub fn unfilter_row(filter: FilterType, row: &mut [u8], prev: &[u8], bpp: usize) {
    debug_assert_eq!(row.len(), prev.len());
    match filter {
        FilterType::None => {}
        FilterType::Sub => {
            for i in bpp..row.len() {
                row[i] = row[i].wrapping_add(row[i - bpp]);
            }
        }
        FilterType::Up => {
            for (byte, &above) in row.iter_mut().zip(prev) {
                *byte = byte.wrapping_add(above);
            }
        }
        FilterType::Average => {
            for i in 0..row.len() {
                let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let above = prev[i] as u16;
                row[i] = row[i].wrapping_add(((left + above) / 2) as u8);
            }
        }
        FilterType::Paeth => {
            for i in 0..row.len() {
                let (left, upper_left) = if i >= bpp {
                    (row[i - bpp], prev[i - bpp])
                } else {
                    (0, 0)
                };
                row[i] = row[i].wrapping_add(paeth_predictor(left, prev[i], upper_left));
            }
        }
    }
}

/// Paeth predictor.
///
/// Selects the value (a, b, or c) closest to p = a + b - c; ties prefer
/// a, then b.
#[inline]
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let a_i = a as i16;
    let b_i = b as i16;
    let c_i = c as i16;

    let p = a_i + b_i - c_i;
    let pa = (p - a_i).abs();
    let pb = (p - b_i).abs();
    let pc = (p - c_i).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}
