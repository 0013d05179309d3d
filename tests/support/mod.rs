//! Shared helpers for assembling zlib streams and PNG files in tests.

#![allow(dead_code)]

pub mod synthetic;

use std::io::Write;

use flate2::write::{DeflateEncoder, ZlibEncoder};
use flate2::Compression;
use pngflate::checksum::crc32::chunk_crc;
use pngflate::png::PNG_SIGNATURE;

/// Compress `data` into a zlib stream with flate2.
pub fn zlib_compress(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Compress `data` into a raw DEFLATE stream with flate2.
pub fn deflate_raw(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Frame one chunk with a correct CRC.
pub fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc(kind, data).to_be_bytes());
    out
}

/// IHDR chunk for a non-interlaced image.
pub fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut data = Vec::with_capacity(13);
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
    chunk(b"IHDR", &data)
}

/// Signature followed by the given chunks, in order.
pub fn assemble_png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

/// Prefix every `stride`-byte row with filter type 0.
pub fn filter_none(raw: &[u8], stride: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len() + raw.len() / stride.max(1));
    for row in raw.chunks(stride) {
        out.push(0);
        out.extend_from_slice(row);
    }
    out
}

/// A full PNG whose IDAT stream is split into pieces of `split` bytes.
pub fn png_with_split_idat(
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    filtered: &[u8],
    split: usize,
) -> Vec<u8> {
    let stream = zlib_compress(filtered, 6);
    let mut chunks = vec![ihdr(width, height, bit_depth, color_type)];
    for piece in stream.chunks(split.max(1)) {
        chunks.push(chunk(b"IDAT", piece));
    }
    chunks.push(chunk(b"IEND", &[]));
    assemble_png(&chunks)
}

/// Encode raw pixels with the `png` crate using a fixed filter.
pub fn encode_with_png_crate(
    raw: &[u8],
    width: u32,
    height: u32,
    color: png::ColorType,
    depth: png::BitDepth,
    filter: png::FilterType,
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_filter(filter);
        encoder.set_adaptive_filter(png::AdaptiveFilterType::NonAdaptive);
        if color == png::ColorType::Indexed {
            let palette: Vec<u8> = (0..=255u8).flat_map(|i| [i, 255 - i, i / 2]).collect();
            encoder.set_palette(palette);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(raw).unwrap();
    }
    out
}
