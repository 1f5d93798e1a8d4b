//! ebwt-inspect CLI entry point
//!
//! Prints the references, names or build summary of a BWT index.

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use ebwt_inspect::core::io::stdout_writer;
use ebwt_inspect::core::{InspectConfig, InspectError, InspectMode, LineWidth};
use ebwt_inspect::inspect;
use log::{debug, error};
use std::path::PathBuf;
use std::time::Instant;

#[cfg(target_pointer_width = "64")]
const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (64-bit)");
#[cfg(not(target_pointer_width = "64"))]
const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (32-bit)");

#[derive(Parser)]
#[command(name = "ebwt-inspect")]
#[command(about = "Extract references, names or a summary from a BWT index")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Index base name (file names minus the trailing .1.ebwt etc.)
    #[arg(value_name = "EBWT_BASE")]
    index: PathBuf,

    /// Number of alphabet characters per FASTA line; -1 or 0 disables wrapping
    #[arg(
        short = 'a',
        long,
        default_value = "60",
        allow_negative_numbers = true,
        value_parser = parse_across
    )]
    across: LineWidth,

    /// Print reference sequence names only
    #[arg(short = 'n', long)]
    names: bool,

    /// Print summary incl. ref names, lengths, index properties
    #[arg(short = 's', long)]
    summary: bool,

    /// Reconstruct references from the joined text instead of the packed store;
    /// bases are still read from <EBWT_BASE>.3.ebwt/.4.ebwt
    #[arg(short = 'e', long = "ebwt-ref")]
    ebwt_ref: bool,

    /// Verbose output (for debugging)
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print usage and exit
    #[arg(long = "usage", action = ArgAction::Help)]
    _usage: Option<bool>,
}

fn parse_across(value: &str) -> Result<LineWidth, String> {
    let across: i64 = value
        .parse()
        .map_err(|_| format!("'{}' is not an integer", value))?;
    LineWidth::from_across(across).map_err(|e| e.to_string())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Build the run configuration and execute it
fn run(cli: Cli) -> Result<(), InspectError> {
    let mode = InspectMode::from_flags(cli.names, cli.summary, cli.ebwt_ref);
    let config = InspectConfig::new(cli.index, mode, cli.across, cli.verbose)?;

    if cfg!(target_endian = "little") {
        debug!("Local endianness: little");
    } else {
        debug!("Local endianness: big");
    }
    debug!("Mode: {:?}, line width: {:?}", config.mode, config.line_width);

    inspect(&config, &mut stdout_writer())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    match run(cli) {
        Ok(()) => {
            debug!("Done in {:.2}s", start.elapsed().as_secs_f64());
            Ok(())
        }
        Err(InspectError::Usage(msg)) => Cli::command().error(ErrorKind::InvalidValue, msg).exit(),
        Err(e) => {
            let args: Vec<String> = std::env::args().collect();
            error!("Command: {}", args.join(" "));
            Err(e.into())
        }
    }
}
