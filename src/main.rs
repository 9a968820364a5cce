use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use kicad_pincheck::{
    parse_symbol_library, render_json, render_text, verify, FootprintLibraryIndex, Status,
};

/// Verify KiCad symbol pins match footprint pads
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Symbol library file(s), comma-separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    symbols: Vec<PathBuf>,

    /// Footprint directories (.pretty folders or their parents), comma-separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    footprints: Vec<PathBuf>,

    /// Show all results including matches
    #[arg(short, long)]
    verbose: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // every input path is validated before any parsing starts
    for path in args.symbols.iter().chain(&args.footprints) {
        if !path.exists() {
            bail!("input path not found: {}", path.display());
        }
    }

    let mut symbols = Vec::new();
    for file in &args.symbols {
        let content = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let parsed = parse_symbol_library(&content);
        info!("loaded {} symbols from {}", parsed.len(), file.display());
        symbols.extend(parsed);
    }

    let index = FootprintLibraryIndex::load(&args.footprints)?;

    // symbols with no footprint assigned are not verified at all
    let results: Vec<_> = symbols
        .iter()
        .filter(|symbol| !symbol.footprint.is_empty())
        .map(|symbol| verify(symbol, &index))
        .collect();

    if args.json {
        println!("{}", render_json(&results)?);
    } else {
        print!("{}", render_text(&results, args.verbose));
    }

    let failed = results.iter().any(|r| r.status() == Status::Mismatch);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
