//! TOML configuration for batch runs.
//!
//! A config file names the corpora to test (each with the verdict every
//! integer in it is expected to receive), an optional odd range checked
//! against the Miller–Rabin oracle, the algorithm variant, and harness
//! behaviour. See `shunia.toml` at the repository root for a full example.

use anyhow::{bail, Context, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::candidates::{CandidateFile, OddRange};
use crate::shunia::ShuniaConfig;

/// Top-level batch configuration: `[harness]`, `[algorithm]`, `[[corpus]]`,
/// and `[range]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub harness: HarnessConfig,
    #[serde(default)]
    pub algorithm: ShuniaConfig,
    #[serde(default)]
    pub corpus: Vec<CorpusConfig>,
    pub range: Option<RangeConfig>,
}

/// The `[harness]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarnessConfig {
    /// Log every candidate's verdict, not only mismatches.
    #[serde(default)]
    pub log_all_results: bool,
    /// Stop a batch at its first mismatch (in input order).
    #[serde(default = "default_true")]
    pub stop_on_mismatch: bool,
    /// Rayon worker threads; 0 uses all logical cores.
    #[serde(default)]
    pub threads: usize,
    #[serde(default = "default_progress_interval")]
    pub progress_interval_secs: u64,
    /// Candidates per parallel block when sweeping a range.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            log_all_results: false,
            stop_on_mismatch: true,
            threads: 0,
            progress_interval_secs: default_progress_interval(),
            block_size: default_block_size(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_progress_interval() -> u64 {
    30
}

fn default_block_size() -> usize {
    10_000
}

/// Expected verdict for every integer of a corpus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    Prime,
    Composite,
}

impl Expected {
    pub fn is_prime(self) -> bool {
        self == Expected::Prime
    }
}

/// A `[[corpus]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorpusConfig {
    pub path: PathBuf,
    pub expected: Expected,
    /// Integers to read; 0 reads the whole file.
    #[serde(default)]
    pub limit: usize,
    pub name: Option<String>,
}

impl CorpusConfig {
    pub fn source(&self) -> CandidateFile {
        CandidateFile::new(&self.path).with_limit(self.limit)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The `[range]` section. Bounds are decimal strings so they may exceed u64.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeConfig {
    pub start: String,
    pub end: String,
}

impl RangeConfig {
    pub fn to_range(&self) -> Result<OddRange> {
        let start = parse_bound("start", &self.start)?;
        let end = parse_bound("end", &self.end)?;
        Ok(OddRange::new(start, end))
    }
}

fn parse_bound(field: &str, text: &str) -> Result<Integer> {
    Integer::parse(text.trim())
        .map(Integer::from)
        .with_context(|| format!("range.{} is not an integer: {:?}", field, text))
}

impl BatchConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let config: BatchConfig = toml::from_str(text).context("invalid batch config")?;
        Ok(config)
    }

    /// Load from a file. Relative corpus paths resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config =
            Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
        if let Some(base) = path.parent() {
            for corpus in &mut config.corpus {
                if corpus.path.is_relative() {
                    corpus.path = base.join(&corpus.path);
                }
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.corpus.is_empty() && self.range.is_none() {
            bail!("nothing to test: add a [[corpus]] entry or a [range]");
        }
        if self.harness.progress_interval_secs == 0 {
            bail!("harness.progress_interval_secs must be positive");
        }
        if self.harness.block_size == 0 {
            bail!("harness.block_size must be positive");
        }
        if let Some(range) = &self.range {
            let range = range.to_range()?;
            if range.end() <= range.start() {
                bail!(
                    "range.end ({}) must be greater than range.start ({})",
                    range.end(),
                    range.start()
                );
            }
        }
        Ok(())
    }
}
