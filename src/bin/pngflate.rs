//! pngflate CLI - PNG decoding tool
//!
//! Decodes a PNG file, prints its image descriptor and optionally writes
//! the raw (defiltered, unconverted) pixel bytes to a file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::LevelFilter;

use pngflate::png::{ChecksumPolicy, ChunkPolicy, DecodeOptions};

/// Decode a PNG file with a from-scratch INFLATE implementation.
#[derive(Parser, Debug)]
#[command(name = "pngflate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PNG file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write raw pixel bytes (height * stride) to this file
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Reject unknown chunks and verify every chunk CRC
    #[arg(long)]
    strict: bool,

    /// Verify chunk CRCs
    #[arg(long)]
    verify_crc: bool,

    /// Accept image data whose Adler-32 does not match (logs a warning)
    #[arg(long)]
    allow_bad_checksum: bool,

    /// Refuse images with more pixels than this
    #[arg(long, value_name = "PIXELS")]
    max_pixels: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn decode_options(&self) -> DecodeOptions {
        let mut options = if self.strict {
            DecodeOptions::strict()
        } else {
            DecodeOptions::default()
        };
        if self.verify_crc {
            options.verify_crc = true;
        }
        if self.allow_bad_checksum {
            options.checksum_policy = ChecksumPolicy::Warn;
        }
        options.max_pixels = self.max_pixels;
        options
    }

    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.decode_options();

    let bytes = fs::read(&args.input)?;
    let start = Instant::now();
    let image = pngflate::decode_png_with_options(&bytes, &options)?;
    let elapsed = start.elapsed();

    if !args.quiet {
        let desc = &image.descriptor;
        println!("File:       {}", args.input.display());
        println!("Dimensions: {}x{}", desc.width, desc.height);
        println!("Color type: {:?} ({})", desc.color_type, desc.color_type.png_value());
        println!("Bit depth:  {}", desc.bit_depth);
        println!("Stride:     {} bytes", desc.stride());
        println!("Raw size:   {} bytes", image.pixels.len());
        if let Some(palette) = &image.palette {
            println!("Palette:    {} entries", palette.len());
        }
        if !image.checksum_ok {
            println!("Checksum:   MISMATCH (data used anyway)");
        }
        if options.chunk_policy != ChunkPolicy::Skip {
            println!("Chunks:     {:?}", options.chunk_policy);
        }
        println!("Decoded in: {:.2?}", elapsed);
    }

    if let Some(output) = &args.output {
        fs::write(output, &image.pixels)?;
        if !args.quiet {
            println!("Wrote {} bytes to {}", image.pixels.len(), output.display());
        }
    }

    Ok(())
}
