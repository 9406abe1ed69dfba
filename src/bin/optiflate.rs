use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use optiflate::{BlockMode, CompressionConfig, CompressionLevel, Compressor, FinderKind};

#[derive(Parser, Debug)]
#[command(name = "optiflate")]
#[command(about = "Compress data into a raw DEFLATE stream with optimal parsing")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Compression level (1-9)
    #[arg(short, long, default_value = "6", value_parser = clap::value_parser!(u8).range(1..=9))]
    level: u8,

    /// Block coding: fixed, dynamic or auto (default: from level)
    #[arg(long)]
    mode: Option<BlockMode>,

    /// Maximum optimization passes per block (default: from level)
    #[arg(long)]
    passes: Option<usize>,

    /// Code the whole input as a single block
    #[arg(long)]
    no_split: bool,

    /// Use the exhaustive match finder (slow, for small inputs)
    #[arg(long)]
    exhaustive: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = CompressionConfig::from_level(CompressionLevel::from_level(args.level));
    if let Some(mode) = args.mode {
        config.block_mode = mode;
    }
    if let Some(passes) = args.passes {
        config.passes.max_passes = passes;
    }
    if args.no_split {
        config.split = None;
    }
    if args.exhaustive {
        config.finder = FinderKind::Exhaustive;
    }

    // Read all input
    let is_stdin = args.input.to_str() == Some("-");
    let mut input = Vec::new();
    if is_stdin {
        io::stdin().lock().read_to_end(&mut input)?;
    } else {
        BufReader::new(File::open(&args.input)?).read_to_end(&mut input)?;
    }

    let is_stdout = args.output.to_str() == Some("-");
    let output: Box<dyn io::Write> = if is_stdout {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(&args.output)?))
    };

    let start = std::time::Instant::now();
    let mut compressor = Compressor::new(config)?;
    let stats = compressor.compress_to(&input, output)?;
    let elapsed = start.elapsed();

    if args.verbose {
        eprintln!("Compression complete:");
        eprintln!("  Input bytes:      {}", stats.input_bytes);
        eprintln!("  Output bytes:     {}", stats.output_bytes);
        eprintln!(
            "  Ratio:            {:.3}",
            stats.output_bytes as f64 / stats.input_bytes.max(1) as f64
        );
        eprintln!(
            "  Blocks:           {} ({} fixed, {} dynamic)",
            stats.blocks, stats.fixed_blocks, stats.dynamic_blocks
        );
        eprintln!("  Tokens:           {} literals, {} matches", stats.literals, stats.matches);
        eprintln!("  Passes:           {}", stats.passes);
        eprintln!("  Time:             {:.2?}", elapsed);
        eprintln!(
            "  Throughput:       {:.1} MB/s",
            stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
        );
    }

    Ok(())
}
