//! # Harness — Batch Verification Against Expected Verdicts
//!
//! Feeds corpora of integers with a known verdict (primes, Perrin/base-2
//! pseudoprimes) and odd ranges (checked against the Miller–Rabin oracle)
//! through the decision procedure, and reports every disagreement as a
//! `VerificationMismatch`.
//!
//! ## Execution
//!
//! Candidates within a batch are independent, so each batch is evaluated with
//! Rayon `par_iter`. Results are logged through `tracing`, which serialises
//! writes to the output sink. With `stop_on_mismatch` the batch stops at the
//! first mismatch in input order (`find_map_first`) and the remaining batches
//! are skipped. Mismatches are returned in the reports, never raised.
//!
//! ## Lineage Comparison
//!
//! `compare_lineages` runs two algorithm variants over the same candidates
//! and returns every integer on which their verdicts differ.

use anyhow::Result;
use rayon::prelude::*;
use rug::Integer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

use crate::arith::ArithmeticError;
use crate::candidates::OddRange;
use crate::config::{BatchConfig, CorpusConfig, Expected, HarnessConfig};
use crate::estimate_digits;
use crate::miller_rabin::heuristic_is_prime;
use crate::progress::Progress;
use crate::shunia::{Decision, Reason, ShuniaConfig};

/// A candidate whose verdict disagrees with the expected one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected prime={expected} but found prime={actual} for n={n}")]
pub struct VerificationMismatch {
    pub n: Integer,
    pub expected: bool,
    pub actual: bool,
    pub reason: Reason,
}

/// Outcome of one batch (a corpus file or a range).
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub name: String,
    pub tested: u64,
    pub mismatches: Vec<VerificationMismatch>,
    pub elapsed: Duration,
    /// The batch ended early on a mismatch.
    pub stopped: bool,
}

impl BatchReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "tested": self.tested,
            "passed": self.passed(),
            "stopped": self.stopped,
            "elapsed_secs": self.elapsed.as_secs_f64(),
            "mismatches": self.mismatches.iter().map(|m| serde_json::json!({
                "n": m.n.to_string(),
                "expected": m.expected,
                "actual": m.actual,
                "stage": m.reason.stage(),
                "reason": m.reason.to_string(),
            })).collect::<Vec<_>>(),
        })
    }
}

/// Candidates on which two algorithm variants disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disagreement {
    pub n: Integer,
    pub first: Decision,
    pub second: Decision,
}

pub struct Harness {
    config: HarnessConfig,
    algorithm: ShuniaConfig,
    progress: Arc<Progress>,
}

/// (tested, mismatches, stopped) for one block of candidates.
type BlockOutcome = (u64, Vec<VerificationMismatch>, bool);

impl Harness {
    pub fn new(config: HarnessConfig, algorithm: ShuniaConfig) -> Self {
        Harness {
            config,
            algorithm,
            progress: Progress::new(),
        }
    }

    pub fn progress(&self) -> &Arc<Progress> {
        &self.progress
    }

    /// Run every corpus, then the range, as configured. Starts the background
    /// progress reporter for the duration of the run.
    pub fn run(&self, batch: &BatchConfig) -> Result<Vec<BatchReport>> {
        let reporter = self
            .progress
            .start_reporter(Duration::from_secs(self.config.progress_interval_secs));
        let start = Instant::now();
        let result = self.run_batches(batch);
        self.progress.stop();
        let _ = reporter.join();
        self.progress.print_status();
        info!(
            elapsed_secs = format_args!("{:.3}", start.elapsed().as_secs_f64()),
            "batch run complete"
        );
        result
    }

    fn run_batches(&self, batch: &BatchConfig) -> Result<Vec<BatchReport>> {
        let mut reports = Vec::new();
        for corpus in &batch.corpus {
            let report = self.run_file(corpus)?;
            let stop = report.stopped;
            reports.push(report);
            if stop {
                warn!("stopping after first mismatch; remaining batches skipped");
                return Ok(reports);
            }
        }
        if let Some(range) = &batch.range {
            reports.push(self.run_range(&range.to_range()?)?);
        }
        Ok(reports)
    }

    /// Read a corpus file and check every integer against its expected verdict.
    pub fn run_file(&self, corpus: &CorpusConfig) -> Result<BatchReport> {
        let name = corpus.display_name();
        let candidates = corpus.source().read()?;
        info!(corpus = %name, count = candidates.len(), expected = ?corpus.expected, "testing corpus");
        self.run_corpus(&name, &candidates, corpus.expected)
    }

    /// Check in-memory candidates that should all receive `expected`.
    pub fn run_corpus(
        &self,
        name: &str,
        candidates: &[Integer],
        expected: Expected,
    ) -> Result<BatchReport> {
        self.progress.set_current(name);
        let start = Instant::now();
        let (tested, mismatches, stopped) =
            self.check_block(candidates, |_| expected.is_prime())?;
        let report = BatchReport {
            name: name.to_string(),
            tested,
            mismatches,
            elapsed: start.elapsed(),
            stopped,
        };
        log_report(&report);
        Ok(report)
    }

    /// Sweep the odd integers of `range`, expecting the Miller–Rabin oracle's verdict.
    pub fn run_range(&self, range: &OddRange) -> Result<BatchReport> {
        let name = format!("odd n in [{}, {})", range.start(), range.end());
        info!(range = %name, count = %range.len(), "testing range");
        let start = Instant::now();
        let mut tested = 0;
        let mut mismatches = Vec::new();
        let mut stopped = false;
        for block in range.blocks(self.config.block_size) {
            if let Some(first) = block.first() {
                self.progress.set_current(format!(
                    "{} (~{} digits)",
                    first,
                    estimate_digits(first)
                ));
            }
            let (block_tested, block_mismatches, block_stopped) =
                self.check_block(&block, heuristic_is_prime)?;
            tested += block_tested;
            mismatches.extend(block_mismatches);
            if block_stopped {
                stopped = true;
                break;
            }
        }
        let report = BatchReport {
            name,
            tested,
            mismatches,
            elapsed: start.elapsed(),
            stopped,
        };
        log_report(&report);
        Ok(report)
    }

    fn check_block<F>(&self, candidates: &[Integer], expected: F) -> Result<BlockOutcome>
    where
        F: Fn(&Integer) -> bool + Sync,
    {
        if self.config.stop_on_mismatch {
            let first = candidates
                .par_iter()
                .enumerate()
                .map(|(i, n)| (i, self.check_one(n, expected(n))))
                .find_map_first(|(i, outcome)| match outcome {
                    Ok(None) => None,
                    other => Some((i, other)),
                });
            return match first {
                None => Ok((candidates.len() as u64, Vec::new(), false)),
                Some((_, Err(e))) => Err(e.into()),
                Some((i, Ok(mismatch))) => {
                    Ok(((i + 1) as u64, mismatch.into_iter().collect(), true))
                }
            };
        }

        let outcomes = candidates
            .par_iter()
            .map(|n| self.check_one(n, expected(n)))
            .collect::<Result<Vec<_>, ArithmeticError>>()?;
        let mismatches = outcomes.into_iter().flatten().collect();
        Ok((candidates.len() as u64, mismatches, false))
    }

    /// Verdict sink for one candidate: decide, log, record, compare.
    fn check_one(
        &self,
        n: &Integer,
        expected: bool,
    ) -> Result<Option<VerificationMismatch>, ArithmeticError> {
        let decision = self.algorithm.decide(n)?;
        let actual = decision.is_prime();
        let mismatch = actual != expected;
        self.progress.record(actual, mismatch);

        if self.config.log_all_results {
            info!(
                n = %n,
                shunia = actual,
                expected,
                stage = decision.reason.stage(),
                "candidate result"
            );
        }
        if !mismatch {
            return Ok(None);
        }
        warn!(
            n = %n,
            expected,
            actual,
            reason = %decision.reason,
            "verification mismatch"
        );
        Ok(Some(VerificationMismatch {
            n: n.clone(),
            expected,
            actual,
            reason: decision.reason,
        }))
    }
}

fn log_report(report: &BatchReport) {
    info!(
        batch = %report.name,
        tested = report.tested,
        mismatches = report.mismatches.len(),
        stopped = report.stopped,
        elapsed_secs = format_args!("{:.3}", report.elapsed.as_secs_f64()),
        "batch finished"
    );
}

/// Evaluate `first` and `second` on every candidate; return those with
/// differing verdicts, in input order.
pub fn compare_lineages(
    candidates: &[Integer],
    first: &ShuniaConfig,
    second: &ShuniaConfig,
) -> Result<Vec<Disagreement>, ArithmeticError> {
    let all = candidates
        .par_iter()
        .map(|n| -> Result<Option<Disagreement>, ArithmeticError> {
            let a = first.decide(n)?;
            let b = second.decide(n)?;
            if a.is_prime() == b.is_prime() {
                return Ok(None);
            }
            Ok(Some(Disagreement {
                n: n.clone(),
                first: a,
                second: b,
            }))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(all.into_iter().flatten().collect())
}
