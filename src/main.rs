//! mutrate - per-sequence mutation rates from an aligned FASTA file.
//!
//! ## Usage
//!
//! ```bash
//! mutrate --fasta alignment.fasta --ref Seq1
//! mutrate --fasta alignment.fasta --ref Seq1 --out results.csv
//! mutrate --fasta alignment.fasta --ref Seq1 --out - | sort   # CSV on stdout
//! ```
//!
//! ## Exit codes
//!
//! - `0`: success
//! - `2`: input file missing or unreadable
//! - `3`: reference identifier not in the alignment
//! - `4`: alignment records have unequal lengths (or are otherwise malformed)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use mutrate::controller::{run, CsvOutput, RunConfig, RunError};
use mutrate::metrics::{GapSet, DEFAULT_GAP};
use mutrate::report::DEFAULT_PRECISION;

/// mutrate - Mutation counts and rates against a reference sequence
///
/// Prints one row per sequence of the alignment: length, number of
/// comparable (ungapped) sites, mismatches and mutation rate.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aligned FASTA file (all sequences of equal length, gaps included)
    #[arg(long = "fasta")]
    fasta: PathBuf,

    /// Identifier of the reference sequence (header without '>')
    #[arg(long = "ref")]
    reference: String,

    /// Also write the table as CSV to this file. Use "-" for CSV on stdout.
    #[arg(short = 'o', long = "out")]
    out: Option<String>,

    /// Progress messages on stderr (repeat for per-sequence details)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Characters treated as gaps
    #[arg(long = "gap", allow_hyphen_values = true, default_value_t = DEFAULT_GAP.to_string())]
    gap: String,

    /// Decimal places of the mutation rate in the printed table
    #[arg(long = "precision", default_value_t = DEFAULT_PRECISION)]
    precision: usize,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.fasta, self.reference);
        config.csv_output = CsvOutput::from_arg(self.out.as_deref());
        config.gaps = GapSet::new(&self.gap);
        config.precision = self.precision;
        config
    }
}

fn run_cli_mode(args: Args) -> Result<()> {
    TermLogger::init(
        args.log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    let config = args.into_config();
    info!(
        "Computing mutation rates for {} against reference '{}'",
        config.fasta_path.display(),
        config.reference_id
    );

    let results = run(&config)?;
    info!("Done: {} sequences", results.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run_cli_mode(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {}", err);
            let code = err
                .downcast_ref::<RunError>()
                .map(RunError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
