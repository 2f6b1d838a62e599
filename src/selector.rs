//! # Selector — Ring Degree Choice
//!
//! Picks the degree d of the quotient ring Z[x]/(n, x^d − 2) for a candidate
//! n by scanning i = 3..=max(⌊log₂ n⌋, 3) for the first i that does not
//! divide n − 1. Two variants exist and they can disagree for the same n
//! (2047 gets d = 5 from one and d = 4 from the other).
//!
//! If no admissible i turns up before the bound, the last value scanned is
//! used. For n = 13 the bound is 3 and 3 | 12, so d = 3 regardless. The scan
//! is never retried with a larger bound.

use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::floor_log2;
use crate::miller_rabin::heuristic_is_prime_u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorVariant {
    /// Smallest prime i ≥ 3 with i ∤ n − 1.
    #[default]
    PrimeGated,
    /// Smallest integer i ≥ 3 with i ∤ n − 1.
    Ungated,
}

impl fmt::Display for SelectorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorVariant::PrimeGated => write!(f, "prime-gated"),
            SelectorVariant::Ungated => write!(f, "ungated"),
        }
    }
}

/// Upper end of the degree scan: max(⌊log₂ n⌋, 3).
pub fn scan_limit(n: &Integer) -> u64 {
    floor_log2(n).max(3)
}

/// Choose the ring degree d for candidate `n` (odd, n > 7 on the main path).
pub fn select_degree(n: &Integer, variant: SelectorVariant) -> usize {
    let n_minus_1 = Integer::from(n - 1u32);
    let mut d = 2u64;
    for i in 3..=scan_limit(n) {
        d = i;
        if variant == SelectorVariant::PrimeGated && !heuristic_is_prime_u64(i) {
            continue;
        }
        if !n_minus_1.is_divisible(&Integer::from(i)) {
            break;
        }
    }
    d as usize
}
