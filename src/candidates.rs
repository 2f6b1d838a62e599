//! # Candidates — Integer Sources for the Batch Harness
//!
//! Two restartable sources of candidates:
//!
//! - `CandidateFile`: one decimal integer per line. Blank lines are skipped,
//!   surrounding whitespace is ignored, and an optional cap limits how many
//!   integers are yielded. Every `iter()` re-opens the file.
//! - `OddRange`: the odd integers in `[start, end)`, handed out in fixed-size
//!   blocks so a sweep up to 2³² never materialises in memory at once.

use anyhow::{anyhow, Context, Result};
use rug::Integer;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CandidateFile {
    path: PathBuf,
    limit: Option<usize>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CandidateFile {
            path: path.into(),
            limit: None,
        }
    }

    /// Cap the number of integers yielded. 0 means no cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn iter(&self) -> Result<IntegerLines<BufReader<File>>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open candidate file {}", self.path.display()))?;
        Ok(IntegerLines::new(
            BufReader::new(file),
            self.path.display().to_string(),
            self.limit,
        ))
    }

    /// Read every integer (up to the cap) into memory.
    pub fn read(&self) -> Result<Vec<Integer>> {
        self.iter()?.collect()
    }
}

/// Streaming parser over line-delimited integers.
pub struct IntegerLines<R> {
    lines: Lines<R>,
    source: String,
    line_no: usize,
    yielded: usize,
    limit: Option<usize>,
}

impl<R: BufRead> IntegerLines<R> {
    pub fn new(reader: R, source: impl Into<String>, limit: Option<usize>) -> Self {
        IntegerLines {
            lines: reader.lines(),
            source: source.into(),
            line_no: 0,
            yielded: 0,
            limit,
        }
    }
}

impl<R: BufRead> Iterator for IntegerLines<R> {
    type Item = Result<Integer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|limit| self.yielded >= limit) {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(anyhow!(e).context(format!(
                        "failed to read {} after line {}",
                        self.source, self.line_no
                    ))))
                }
            };
            self.line_no += 1;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            self.yielded += 1;
            return Some(Integer::parse(text).map(Integer::from).map_err(|e| {
                anyhow!(
                    "{}:{}: invalid integer {:?}: {}",
                    self.source,
                    self.line_no,
                    text,
                    e
                )
            }));
        }
    }
}

/// Odd integers in `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddRange {
    start: Integer,
    end: Integer,
}

impl OddRange {
    pub fn new(start: Integer, end: Integer) -> Self {
        OddRange { start, end }
    }

    pub fn start(&self) -> &Integer {
        &self.start
    }

    pub fn end(&self) -> &Integer {
        &self.end
    }

    /// Number of odd integers in the range.
    pub fn len(&self) -> Integer {
        let first = self.first_odd();
        if first >= self.end {
            return Integer::new();
        }
        // odd values first, first+2, ..., < end
        (Integer::from(&self.end - &first) + 1u32) >> 1u32
    }

    pub fn is_empty(&self) -> bool {
        self.first_odd() >= self.end
    }

    fn first_odd(&self) -> Integer {
        if self.start.is_odd() {
            self.start.clone()
        } else {
            Integer::from(&self.start + 1u32)
        }
    }

    /// Iterate the range in blocks of at most `block_size` candidates.
    pub fn blocks(&self, block_size: usize) -> OddBlocks {
        OddBlocks {
            next: self.first_odd(),
            end: self.end.clone(),
            block_size: block_size.max(1),
        }
    }
}

pub struct OddBlocks {
    next: Integer,
    end: Integer,
    block_size: usize,
}

impl Iterator for OddBlocks {
    type Item = Vec<Integer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let mut block = Vec::with_capacity(self.block_size);
        while block.len() < self.block_size && self.next < self.end {
            block.push(self.next.clone());
            self.next += 2u32;
        }
        Some(block)
    }
}
