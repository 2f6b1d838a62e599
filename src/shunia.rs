//! # Shunia — Fermat Filter plus Frobenius Check
//!
//! Decides primality of an odd candidate n in four steps:
//!
//! 1. **Trivial cases.** Even n is prime iff n = 2; odd n ≤ 7 (and > 1) is
//!    accepted outright.
//! 2. **Fermat.** Reject unless 2^(n−1) ≡ 1 (mod n).
//! 3. **Ring parameters.** Choose the degree d (`selector`) and the witness
//!    v0 = 2^((n−1)/d) mod n.
//! 4. **Frobenius.** Compute p1 = (1 + x)^n in Z[x]/(n, x^d − 2). For prime n
//!    the Frobenius map sends x to x^n = x^(n mod d)·2^⌊n/d⌋, so
//!    p1 = 1 + v0·x^(n mod d), which is then checked one of two ways.
//!
//! ## Verification Strategies
//!
//! - **Positional**: p1[0] = 1, p1[n mod d] = v0, every other coefficient 0.
//! - **Sum-at-one**: (v0 + 1)^n ≡ v0 + 1 and p1(1) ≡ v0 + 1 (mod n). Weaker
//!   than positional (it only looks at the coefficient sum) but paired with a
//!   second Fermat-style test.
//!
//! Two presets bundle a selector with a strategy, matching the two versions
//! the test has been published in. `ShuniaConfig::default()` is the
//! positional preset.
//!
//! The test is heuristic. It is not claimed to be a primality proof.

use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::arith::{modpow, normalize, ArithmeticError};
use crate::poly::{evaluate, power, Poly};
use crate::selector::{select_degree, SelectorVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verification {
    #[default]
    Positional,
    SumAtOne,
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verification::Positional => write!(f, "positional"),
            Verification::SumAtOne => write!(f, "sum-at-one"),
        }
    }
}

/// Algorithm variant: how d is chosen and how p1 is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShuniaConfig {
    #[serde(default)]
    pub selector: SelectorVariant,
    #[serde(default)]
    pub verification: Verification,
}

impl ShuniaConfig {
    /// Prime-gated degree scan with positional coefficient checks.
    pub const fn positional() -> Self {
        ShuniaConfig {
            selector: SelectorVariant::PrimeGated,
            verification: Verification::Positional,
        }
    }

    /// Ungated degree scan with the secondary Fermat and sum-at-one checks.
    pub const fn sum_at_one() -> Self {
        ShuniaConfig {
            selector: SelectorVariant::Ungated,
            verification: Verification::SumAtOne,
        }
    }

    pub fn decide(&self, n: &Integer) -> Result<Decision, ArithmeticError> {
        decide(n, self)
    }

    pub fn is_prime(&self, n: &Integer) -> Result<bool, ArithmeticError> {
        Ok(decide(n, self)?.is_prime())
    }
}

impl fmt::Display for ShuniaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.selector, self.verification)
    }
}

/// Quotient-ring parameters chosen for a candidate that passed the Fermat step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingParams {
    pub degree: usize,
    pub witness: Integer,
}

/// Why a candidate was accepted or rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    Two,
    SmallPrime,
    /// Survived the Fermat step and the Frobenius check.
    Certified,
    BelowTwo,
    Even,
    /// 2^(n−1) mod n ≠ 1.
    Fermat { residue: Integer },
    /// p1[0] ≠ 1.
    ConstantTerm { found: Integer },
    /// p1[index] differs from its predicted value.
    Coefficient {
        index: usize,
        expected: Integer,
        found: Integer,
    },
    /// (v0 + 1)^n mod n ≠ v0 + 1.
    SecondaryFermat { expected: Integer, found: Integer },
    /// p1(1) mod n ≠ v0 + 1.
    SumAtOne { expected: Integer, found: Integer },
}

impl Reason {
    pub fn is_accept(&self) -> bool {
        matches!(self, Reason::Two | Reason::SmallPrime | Reason::Certified)
    }

    /// Short machine-friendly label for logs and reports.
    pub fn stage(&self) -> &'static str {
        match self {
            Reason::Two => "two",
            Reason::SmallPrime => "small-prime",
            Reason::Certified => "certified",
            Reason::BelowTwo => "below-two",
            Reason::Even => "even",
            Reason::Fermat { .. } => "fermat",
            Reason::ConstantTerm { .. } => "constant-term",
            Reason::Coefficient { .. } => "coefficient",
            Reason::SecondaryFermat { .. } => "secondary-fermat",
            Reason::SumAtOne { .. } => "sum-at-one",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Two => write!(f, "n = 2"),
            Reason::SmallPrime => write!(f, "odd n <= 7"),
            Reason::Certified => write!(f, "passed Fermat and Frobenius checks"),
            Reason::BelowTwo => write!(f, "n < 2"),
            Reason::Even => write!(f, "even n > 2"),
            Reason::Fermat { residue } => write!(f, "2^(n-1) mod n = {}", residue),
            Reason::ConstantTerm { found } => write!(f, "p1[0] = {}, expected 1", found),
            Reason::Coefficient {
                index,
                expected,
                found,
            } => write!(f, "p1[{}] = {}, expected {}", index, found, expected),
            Reason::SecondaryFermat { expected, found } => {
                write!(f, "(v0+1)^n mod n = {}, expected {}", found, expected)
            }
            Reason::SumAtOne { expected, found } => {
                write!(f, "p1(1) mod n = {}, expected {}", found, expected)
            }
        }
    }
}

/// Outcome of `decide`: the reason, plus the ring parameters when the
/// candidate got far enough to have them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub reason: Reason,
    pub ring: Option<RingParams>,
}

impl Decision {
    fn early(reason: Reason) -> Self {
        Decision { reason, ring: None }
    }

    pub fn is_prime(&self) -> bool {
        self.reason.is_accept()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_prime() { "prime" } else { "composite" };
        write!(f, "{} ({})", verdict, self.reason)?;
        if let Some(ring) = &self.ring {
            write!(f, " [d={}, v0={}]", ring.degree, ring.witness)?;
        }
        Ok(())
    }
}

/// Primality verdict for `n` under the default (positional) preset.
///
/// n < 2 is rejected rather than treated as an error.
pub fn is_prime_shunia(n: &Integer) -> Result<bool, ArithmeticError> {
    ShuniaConfig::default().is_prime(n)
}

/// Run the full decision procedure for `n` under `config`.
pub fn decide(n: &Integer, config: &ShuniaConfig) -> Result<Decision, ArithmeticError> {
    if *n < 2u32 {
        return Ok(Decision::early(Reason::BelowTwo));
    }
    if n.is_even() {
        let reason = if *n == 2u32 { Reason::Two } else { Reason::Even };
        return Ok(Decision::early(reason));
    }
    if *n <= 7u32 {
        return Ok(Decision::early(Reason::SmallPrime));
    }

    let two = Integer::from(2u32);
    let n_minus_1 = Integer::from(n - 1u32);
    let fermat = modpow(&two, &n_minus_1, n)?;
    if fermat != 1u32 {
        return Ok(Decision::early(Reason::Fermat { residue: fermat }));
    }

    let degree = select_degree(n, config.selector);
    let witness = modpow(&two, &Integer::from(&n_minus_1 / degree as u64), n)?;
    let ring = RingParams { degree, witness };
    debug!(n = %n, degree, witness = %ring.witness, variant = %config, "ring parameters");

    let base = Poly::from_coeffs(&[1u32, 1]);
    let q = Poly::from_coeffs(&[2u32]);
    let p1 = power(&base, n, n, degree - 1, &q);
    debug!(n = %n, p1 = %p1, "(1 + x)^n reduced");

    let rejection = match config.verification {
        Verification::Positional => check_positional(n, &p1, &ring),
        Verification::SumAtOne => check_sum_at_one(n, &p1, &ring)?,
    };
    let reason = rejection.unwrap_or(Reason::Certified);
    if !reason.is_accept() {
        debug!(n = %n, stage = reason.stage(), "rejected by Frobenius check");
    }
    Ok(Decision {
        reason,
        ring: Some(ring),
    })
}

/// p1 must equal 1 + v0·x^(n mod d) coefficient by coefficient. Coefficients
/// past the stored length count as zero.
fn check_positional(n: &Integer, p1: &Poly, ring: &RingParams) -> Option<Reason> {
    let zero = Integer::new();
    let constant = p1.coeff(0).unwrap_or(&zero);
    if *constant != 1u32 {
        return Some(Reason::ConstantTerm {
            found: constant.clone(),
        });
    }

    let frobenius_index = n.mod_u(ring.degree as u32) as usize;
    for index in 1..ring.degree {
        let found = p1.coeff(index).unwrap_or(&zero);
        let expected = if index == frobenius_index {
            &ring.witness
        } else {
            &zero
        };
        if found != expected {
            return Some(Reason::Coefficient {
                index,
                expected: expected.clone(),
                found: found.clone(),
            });
        }
    }
    None
}

/// (v0 + 1)^n ≡ v0 + 1 and p1(1) ≡ v0 + 1 (mod n).
fn check_sum_at_one(
    n: &Integer,
    p1: &Poly,
    ring: &RingParams,
) -> Result<Option<Reason>, ArithmeticError> {
    let shifted = Integer::from(&ring.witness + 1u32);
    let expected = normalize(&shifted, n)?;

    let secondary = modpow(&shifted, n, n)?;
    if secondary != expected {
        return Ok(Some(Reason::SecondaryFermat {
            expected,
            found: secondary,
        }));
    }

    let sum = normalize(&evaluate(p1, &Integer::from(1u32), n), n)?;
    if sum != expected {
        return Ok(Some(Reason::SumAtOne {
            expected,
            found: sum,
        }));
    }
    Ok(None)
}
