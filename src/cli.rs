//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for each subcommand and the rayon configuration.

use anyhow::{bail, Context, Result};
use rug::Integer;
use shunia::candidates::CandidateFile;
use shunia::config::{BatchConfig, CorpusConfig, Expected, RangeConfig};
use shunia::harness::{compare_lineages, BatchReport, Harness};
use shunia::ShuniaConfig;
use std::path::Path;
use tracing::{info, warn};

// ── Check ───────────────────────────────────────────────────────

pub fn run_check(numbers: &[String], lineage: Option<ShuniaConfig>, json: bool) -> Result<()> {
    let algorithm = lineage.unwrap_or_default();
    for text in numbers {
        let n = Integer::parse(text.trim())
            .map(Integer::from)
            .with_context(|| format!("not an integer: {:?}", text))?;
        let decision = algorithm.decide(&n)?;
        if json {
            let ring = decision.ring.as_ref();
            println!(
                "{}",
                serde_json::json!({
                    "n": n.to_string(),
                    "prime": decision.is_prime(),
                    "stage": decision.reason.stage(),
                    "reason": decision.reason.to_string(),
                    "degree": ring.map(|r| r.degree),
                    "witness": ring.map(|r| r.witness.to_string()),
                    "variant": algorithm.to_string(),
                })
            );
        } else {
            println!("{}: {}", n, decision);
        }
    }
    Ok(())
}

// ── Batch ───────────────────────────────────────────────────────

/// Flag values for `batch`, applied over the optional config file.
pub struct BatchArgs<'a> {
    pub config: Option<&'a Path>,
    pub pseudoprimes: Option<&'a Path>,
    pub primes: Option<&'a Path>,
    pub limit: usize,
    pub range: Option<(&'a str, &'a str)>,
    pub log_all: bool,
    pub keep_going: bool,
    pub report: Option<&'a Path>,
    pub lineage: Option<ShuniaConfig>,
    pub threads: Option<usize>,
}

/// Merge the config file with command-line flags. Flags win.
fn build_batch_config(args: &BatchArgs<'_>) -> Result<BatchConfig> {
    let mut config = match args.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };
    for (path, expected) in [
        (args.pseudoprimes, Expected::Composite),
        (args.primes, Expected::Prime),
    ] {
        if let Some(path) = path {
            config.corpus.push(CorpusConfig {
                path: path.to_path_buf(),
                expected,
                limit: args.limit,
                name: None,
            });
        }
    }
    if let Some((start, end)) = args.range {
        config.range = Some(RangeConfig {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if args.log_all {
        config.harness.log_all_results = true;
    }
    if args.keep_going {
        config.harness.stop_on_mismatch = false;
    }
    if let Some(lineage) = args.lineage {
        config.algorithm = lineage;
    }
    if let Some(threads) = args.threads {
        config.harness.threads = threads;
    }
    config.validate()?;
    Ok(config)
}

pub fn run_batch(args: &BatchArgs<'_>) -> Result<()> {
    let config = build_batch_config(args)?;
    configure_rayon(Some(config.harness.threads));

    info!(
        cores = rayon::current_num_threads(),
        variant = %config.algorithm,
        corpora = config.corpus.len(),
        range = config.range.is_some(),
        "shunia batch starting"
    );

    let harness = Harness::new(config.harness.clone(), config.algorithm);
    let reports = harness.run(&config)?;
    print_summary(&reports);

    if let Some(path) = args.report {
        let json = serde_json::Value::Array(reports.iter().map(BatchReport::to_json).collect());
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    let mismatches: usize = reports.iter().map(|r| r.mismatches.len()).sum();
    if mismatches > 0 {
        bail!("{} verification mismatch(es)", mismatches);
    }
    Ok(())
}

fn print_summary(reports: &[BatchReport]) {
    for report in reports {
        let status = if report.passed() { "ok" } else { "MISMATCH" };
        println!(
            "{}: {} tested, {} mismatches, {:.3}s [{}]",
            report.name,
            report.tested,
            report.mismatches.len(),
            report.elapsed.as_secs_f64(),
            status
        );
        for m in &report.mismatches {
            println!("  {} ({})", m, m.reason);
        }
    }
}

// ── Compare ─────────────────────────────────────────────────────

pub fn run_compare(input: &Path, limit: usize) -> Result<()> {
    let candidates = CandidateFile::new(input).with_limit(limit).read()?;
    let first = ShuniaConfig::positional();
    let second = ShuniaConfig::sum_at_one();
    let disagreements = compare_lineages(&candidates, &first, &second)?;
    for d in &disagreements {
        println!(
            "{}: {} -> {}; {} -> {}",
            d.n, first, d.first, second, d.second
        );
    }
    println!(
        "{} disagreements among {} candidates",
        disagreements.len(),
        candidates.len()
    );
    Ok(())
}

// ── Rayon ───────────────────────────────────────────────────────

/// Size the global rayon pool. `None` or 0 uses all logical cores.
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => {
            if num_threads > 0 {
                info!(threads = num_threads, "Rayon thread pool configured");
            }
        }
        Err(e) => {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
