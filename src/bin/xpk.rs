use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use xpk::{compress_with, decompress_to_vec, get_decompressed_size, CompressConfig, WidthPolicy};

#[derive(Parser, Debug)]
#[command(name = "xpk")]
#[command(about = "Pack and unpack X-Perts RLE/LZ77 asset blobs")]
#[command(version)]
struct Args {
    /// Source file
    source: PathBuf,

    /// Destination file
    dest: PathBuf,

    /// c = pack, d = unpack
    #[arg(value_enum)]
    mode: Mode,

    /// Hex offset of the packed data inside the source (unpack only)
    #[arg(value_parser = parse_hex)]
    offset: Option<usize>,

    /// Element width used when packing
    #[arg(long, value_enum, default_value = "auto")]
    width: Width,

    /// Threads for the byte/word trials (0 = auto, 1 = sequential)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Show packing statistics (same as --log-level debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    #[value(name = "c")]
    Pack,
    #[value(name = "d")]
    Unpack,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Width {
    Auto,
    Byte,
    Word,
}

impl From<Width> for WidthPolicy {
    fn from(width: Width) -> Self {
        match width {
            Width::Auto => WidthPolicy::Auto,
            Width::Byte => WidthPolicy::Byte,
            Width::Word => WidthPolicy::Word,
        }
    }
}

fn parse_hex(s: &str) -> Result<usize, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    usize::from_str_radix(digits, 16).map_err(|e| format!("invalid hex offset '{}': {}", s, e))
}

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        args.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    info!("X-Perts (Un)packer v{} - RLE/LZ77", env!("CARGO_PKG_VERSION"));

    let data = fs::read(&args.source)?;
    let offset = match (args.mode, args.offset) {
        (Mode::Unpack, Some(offset)) => offset,
        (Mode::Pack, Some(_)) => {
            return Err("an offset is only accepted when unpacking".into());
        }
        (_, None) => 0,
    };
    let src = data
        .get(offset..)
        .ok_or_else(|| format!("offset 0x{:X} is past the end of the source", offset))?;

    let start = Instant::now();

    let (input_size, output) = match args.mode {
        Mode::Pack => {
            let config = CompressConfig {
                width: args.width.into(),
                num_threads: args.threads,
                ..Default::default()
            };
            let compressed = compress_with(src, &config)?;

            let stats = &compressed.stats;
            debug!("Width:            {:?}", stats.width);
            debug!("Literal runs:     {}", stats.literal_runs);
            debug!("Literal elements: {}", stats.literal_elements);
            debug!("Match runs:       {}", stats.match_runs);
            debug!("Matches:          {}", stats.matches);
            debug!("Matched elements: {}", stats.matched_elements);

            (src.len(), compressed.data)
        }
        Mode::Unpack => {
            if get_decompressed_size(src)? == 0 {
                return Err("wrong source data: decompressed size is 0".into());
            }
            let (output, consumed) = decompress_to_vec(src)?;
            (consumed, output)
        }
    };

    fs::write(&args.dest, &output)?;

    debug!("Time:             {:.2?}", start.elapsed());
    info!(
        "Successfully {}! Original size / Result size: {}/{}",
        if args.mode == Mode::Pack { "compressed" } else { "decompressed" },
        input_size,
        output.len()
    );

    Ok(EXIT_OK)
}
