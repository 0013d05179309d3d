//! Synthetic test data.
//!
//! Deterministic byte patterns covering the cases DEFLATE encoders treat
//! differently: long runs, repeated phrases and incompressible noise.

#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A single repeated byte.
pub fn run(len: usize, byte: u8) -> Vec<u8> {
    vec![byte; len]
}

/// English-like text with many repeated phrases.
pub fn text(len: usize) -> Vec<u8> {
    const WORDS: &[&str] = &[
        "the ", "quick ", "brown ", "fox ", "jumps ", "over ", "lazy ", "dog ", "and ",
        "inflate ", "window ", "huffman ", "block ", "stored ", "fixed ", "dynamic ",
    ];
    let mut rng = StdRng::seed_from_u64(0x7E57);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        out.extend_from_slice(WORDS[rng.gen_range(0..WORDS.len())].as_bytes());
    }
    out.truncate(len);
    out
}

/// Uniformly random bytes.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// A 300-byte phrase repeated far apart, exercising distances near 32 KiB.
pub fn far_repeats(len: usize) -> Vec<u8> {
    let phrase = noise(300, 99);
    let filler = noise(32_000, 100);
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        out.extend_from_slice(&phrase);
        out.extend_from_slice(&filler);
    }
    out.truncate(len);
    out
}

/// Horizontal gradient with `channels` samples per pixel.
pub fn gradient(width: u32, height: u32, channels: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255) / width.max(1)) as u8;
            for c in 0..channels {
                pixels.push(v.wrapping_add((y as u8).wrapping_mul(3)).wrapping_add(c as u8 * 40));
            }
        }
    }
    pixels
}

/// Checkerboard with `channels` samples per pixel.
pub fn checkerboard(width: u32, height: u32, cell: u32, channels: usize) -> Vec<u8> {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let v = if ((x / cell) + (y / cell)) % 2 == 0 { 255 } else { 0 };
            pixels.extend(std::iter::repeat(v).take(channels));
        }
    }
    pixels
}
