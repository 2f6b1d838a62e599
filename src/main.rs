//! # Main — CLI Entry Point
//!
//! Routes subcommands to the decision procedure and the batch harness.
//!
//! ## Subcommands
//!
//! - `check`: decide individual integers and print the decision trace.
//! - `batch`: run corpora and/or an odd range against expected verdicts,
//!   from a TOML config, flags, or both (flags win).
//! - `compare`: list the integers of a file on which the two algorithm
//!   lineages disagree.
//!
//! ## Global Options
//!
//! - `--lineage`: algorithm preset (`positional` or `sum-at-one`).
//! - `--threads`: Rayon thread pool size (default: all cores).
//!
//! Logging goes to stderr; `LOG_FORMAT=json` switches to JSON lines and
//! `RUST_LOG` sets the filter (default `info`).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shunia::ShuniaConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "shunia",
    about = "Shunia primality test: Fermat filter plus a Frobenius check in Z[x]/(n, x^d - 2)"
)]
struct Cli {
    /// Algorithm preset (overrides the config file's [algorithm] section)
    #[arg(long, value_enum, global = true)]
    lineage: Option<Lineage>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Lineage {
    /// Prime-gated degree scan, positional coefficient checks
    Positional,
    /// Ungated degree scan, secondary Fermat plus coefficient-sum check
    SumAtOne,
}

impl Lineage {
    fn config(self) -> ShuniaConfig {
        match self {
            Lineage::Positional => ShuniaConfig::positional(),
            Lineage::SumAtOne => ShuniaConfig::sum_at_one(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Test individual integers and print the decision trace
    Check {
        /// Integers to test (decimal)
        #[arg(required = true)]
        numbers: Vec<String>,
        /// Print one JSON object per integer
        #[arg(long)]
        json: bool,
    },
    /// Run corpora and ranges against their expected verdicts
    Batch {
        /// TOML batch config (see shunia.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// File of integers expected to be composite
        #[arg(long)]
        pseudoprimes: Option<PathBuf>,
        /// File of integers expected to be prime
        #[arg(long)]
        primes: Option<PathBuf>,
        /// Read at most this many integers per file (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
        /// Start of an odd range checked against the Miller-Rabin oracle
        #[arg(long, requires = "range_end")]
        range_start: Option<String>,
        /// End (exclusive) of the odd range
        #[arg(long, requires = "range_start")]
        range_end: Option<String>,
        /// Log every candidate's verdict
        #[arg(long)]
        log_all: bool,
        /// Keep testing after a mismatch instead of stopping
        #[arg(long)]
        keep_going: bool,
        /// Write the batch reports as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List integers on which the positional and sum-at-one lineages disagree
    Compare {
        /// File of integers to evaluate
        #[arg(long)]
        input: PathBuf,
        /// Read at most this many integers (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for pipelines, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    match &cli.command {
        Commands::Check { numbers, json } => {
            cli::run_check(numbers, cli.lineage.map(Lineage::config), *json)
        }
        Commands::Batch {
            config,
            pseudoprimes,
            primes,
            limit,
            range_start,
            range_end,
            log_all,
            keep_going,
            report,
        } => {
            let args = cli::BatchArgs {
                config: config.as_deref(),
                pseudoprimes: pseudoprimes.as_deref(),
                primes: primes.as_deref(),
                limit: *limit,
                range: range_start.as_deref().zip(range_end.as_deref()),
                log_all: *log_all,
                keep_going: *keep_going,
                report: report.as_deref(),
                lineage: cli.lineage.map(Lineage::config),
                threads: cli.threads,
            };
            cli::run_batch(&args)
        }
        Commands::Compare { input, limit } => {
            cli::configure_rayon(cli.threads);
            cli::run_compare(input, *limit)
        }
    }
}
