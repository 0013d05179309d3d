//! DEFLATE and zlib conformance tests.
//!
//! Streams produced by flate2 (a reference encoder) must decode back to the
//! original bytes at every compression level, and malformed streams must
//! fail with the right error instead of panicking.

use pngflate::inflate::{inflate, Inflater, State};
use pngflate::zlib::{decompress, decompress_with_limit, inflate_zlib, ZlibHeader};
use pngflate::Error;
use proptest::prelude::*;

mod support;
use support::{deflate_raw, synthetic, zlib_compress};

fn corpus() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", Vec::new()),
        ("one byte", vec![0x42]),
        ("run", synthetic::run(100_000, 0xAA)),
        ("text", synthetic::text(50_000)),
        ("noise", synthetic::noise(40_000, 1)),
        ("far repeats", synthetic::far_repeats(120_000)),
        ("gradient", synthetic::gradient(256, 64, 3)),
    ]
}

#[test]
fn test_zlib_all_levels() {
    for (name, data) in corpus() {
        for level in 0..=9 {
            let stream = zlib_compress(&data, level);
            let out = inflate_zlib(&stream).unwrap_or_else(|e| panic!("{name} level {level}: {e}"));
            assert_eq!(out, data, "{name} level {level}");
        }
    }
}

#[test]
fn test_raw_deflate_all_levels() {
    for (name, data) in corpus() {
        for level in [0, 1, 6, 9] {
            let stream = deflate_raw(&data, level);
            assert_eq!(inflate(&stream).unwrap(), data, "{name} level {level}");
        }
    }
}

#[test]
fn test_level_zero_produces_stored_blocks() {
    // 100 KB does not fit in one stored block.
    let data = synthetic::noise(100_000, 5);
    let stream = deflate_raw(&data, 0);
    let mut inflater = Inflater::new(&stream);
    inflater.run().unwrap();
    assert!(inflater.blocks_decoded() >= 2);
    assert_eq!(inflater.output(), &data[..]);
}

#[test]
fn test_state_sequence_ends_done() {
    let data = synthetic::text(10_000);
    let stream = deflate_raw(&data, 9);
    let mut inflater = Inflater::new(&stream);
    assert_eq!(inflater.state(), &State::BlockHeader);

    let mut steps = 0;
    while !inflater.is_done() {
        inflater.step().unwrap();
        steps += 1;
        assert!(steps < 10_000, "decoder did not terminate");
    }
    assert_eq!(inflater.state(), &State::Done);
    // Further steps are no-ops.
    inflater.step().unwrap();
    assert_eq!(inflater.output(), &data[..]);
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let data = synthetic::text(2_000);
    for level in [0, 1, 9] {
        let stream = zlib_compress(&data, level);
        for cut in 0..stream.len() {
            let result = decompress(&stream[..cut]);
            assert!(
                matches!(result, Err(Error::TruncatedInput)),
                "level {level} cut {cut}: {result:?}"
            );
        }
    }
}

#[test]
fn test_corrupted_streams_never_panic() {
    let data = synthetic::text(4_000);
    let stream = zlib_compress(&data, 6);
    for i in 2..stream.len() {
        for mask in [0x01u8, 0x80, 0xFF] {
            let mut corrupt = stream.clone();
            corrupt[i] ^= mask;
            // Any error or a checksum mismatch is acceptable; a panic is not.
            let _ = decompress(&corrupt);
        }
    }
}

#[test]
fn test_checksum_mismatch_reports_and_keeps_data() {
    let data = synthetic::text(1_000);
    let mut stream = zlib_compress(&data, 6);
    let len = stream.len();
    stream[len - 2] ^= 0x10;

    let out = decompress(&stream).unwrap();
    assert_eq!(out.data, data);
    assert!(!out.checksum_ok());
    assert!(matches!(out.verify(), Err(Error::ChecksumMismatch { .. })));
    assert!(matches!(
        out.into_verified(),
        Err(Error::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_reference_header_bytes() {
    for level in 0..=9 {
        let stream = zlib_compress(b"x", level);
        let header = ZlibHeader::parse(&stream).unwrap();
        assert_eq!(header.window_bits, 15);
    }
}

#[test]
fn test_limit_stops_bomb() {
    let data = synthetic::run(1 << 20, 0);
    let stream = zlib_compress(&data, 9);
    assert!(stream.len() < 4096);
    assert_eq!(
        decompress_with_limit(&stream, Some(64 * 1024)),
        Err(Error::OutputLimitExceeded(64 * 1024))
    );
}

#[test]
fn test_hand_built_fixed_block() {
    // Fixed block: 'a', then length 3 distance 1, then end of block.
    // 'a' = 0x61 -> code 0x30 + 0x61 = 0x91 (8 bits), length 3 = symbol 257
    // (7 bits 0000001), distance code 0 (5 bits 00000), EOB (7 bits 0000000).
    let mut bits: Vec<u8> = vec![1, 1, 0]; // BFINAL=1, BTYPE=01 LSB-first
    let push_code = |bits: &mut Vec<u8>, code: u32, len: u32| {
        for i in (0..len).rev() {
            bits.push(((code >> i) & 1) as u8);
        }
    };
    push_code(&mut bits, 0x91, 8);
    push_code(&mut bits, 0b0000001, 7);
    push_code(&mut bits, 0, 5);
    push_code(&mut bits, 0, 7);

    let mut stream = vec![0u8; bits.len().div_ceil(8)];
    for (i, bit) in bits.iter().enumerate() {
        stream[i / 8] |= bit << (i % 8);
    }
    assert_eq!(inflate(&stream).unwrap(), b"aaaa");
}

#[test]
fn test_raw_trailing_bytes_rejected() {
    let mut stream = deflate_raw(b"hello hello hello", 6);
    stream.push(0);
    assert_eq!(inflate(&stream), Err(Error::UnexpectedTrailingData(1)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_zlib_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096), level in 0u32..=9) {
        let stream = zlib_compress(&data, level);
        prop_assert_eq!(inflate_zlib(&stream).unwrap(), data);
    }

    #[test]
    fn prop_repetitive_roundtrip(
        seed in proptest::collection::vec(any::<u8>(), 1..16),
        repeats in 1usize..2000,
    ) {
        let data: Vec<u8> = seed.iter().copied().cycle().take(seed.len() * repeats).collect();
        let stream = deflate_raw(&data, 6);
        prop_assert_eq!(inflate(&stream).unwrap(), data);
    }

    #[test]
    fn prop_arbitrary_input_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let _ = inflate(&data);
        let _ = decompress(&data);
    }
}
