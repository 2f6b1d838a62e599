//! # Poly — Dense Polynomials over Z, optionally reduced mod m
//!
//! Univariate polynomials stored as a dense coefficient vector, index i being
//! the coefficient of xⁱ, with the handful of operations the Frobenius check
//! needs: schoolbook multiplication, reduction modulo a binomial, binary
//! exponentiation in the quotient ring, and evaluation.
//!
//! ## Conventions
//!
//! - A modulus of 0 means "no coefficient reduction" (exact integer
//!   arithmetic). Every non-zero modulus reduces with the Euclidean remainder,
//!   so coefficients stay in `[0, |m|)`.
//! - `multiply` trims its result to the true highest non-zero index (the zero
//!   polynomial is `[0]`). Without this, repeated squaring grows the
//!   representation without bound.
//! - `reduce_modulo` takes the binomial as its low-order remainder q and the
//!   highest surviving exponent `degree`: it rewrites x^(degree+1) as q(x), so
//!   `degree = d − 1` with `q = [2]` is reduction modulo x^d − 2. Its output is
//!   always exactly `degree + 1` coefficients.
//!
//! ## Complexity
//!
//! Multiplication is O(len(a)·len(b)). Inside `power` both operands have at
//! most d coefficients after reduction, so raising to the n-th power costs
//! O(d²·log n) coefficient multiplications.

use rug::ops::RemRoundingAssign;
use rug::Integer;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Integer>,
}

impl Poly {
    /// Wrap a coefficient vector as-is (no trimming). An empty vector becomes `[0]`.
    pub fn new(coeffs: Vec<Integer>) -> Self {
        if coeffs.is_empty() {
            return Self::zero();
        }
        Poly { coeffs }
    }

    pub fn from_coeffs<T: Copy + Into<Integer>>(coeffs: &[T]) -> Self {
        Self::new(coeffs.iter().map(|&c| c.into()).collect())
    }

    pub fn zero() -> Self {
        Poly {
            coeffs: vec![Integer::new()],
        }
    }

    pub fn one() -> Self {
        Poly {
            coeffs: vec![Integer::from(1u32)],
        }
    }

    pub fn coeffs(&self) -> &[Integer] {
        &self.coeffs
    }

    /// Coefficient of xⁱ, or `None` past the stored length.
    pub fn coeff(&self, i: usize) -> Option<&Integer> {
        self.coeffs.get(i)
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Highest index with a non-zero coefficient, 0 if there is none.
    pub fn degree(&self) -> usize {
        self.coeffs.iter().rposition(|c| *c != 0u32).unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0u32)
    }

    /// Ring equality modulo `modulus`: coefficients are zero-padded to a common
    /// length and compared pairwise for congruence (exact equality when the
    /// modulus is 0).
    pub fn ring_eq(&self, other: &Poly, modulus: &Integer) -> bool {
        let zero = Integer::new();
        let len = self.len().max(other.len());
        (0..len).all(|i| {
            let a = self.coeff(i).unwrap_or(&zero);
            let b = other.coeff(i).unwrap_or(&zero);
            if *modulus == 0u32 {
                a == b
            } else {
                Integer::from(a - b).is_divisible(modulus)
            }
        })
    }

    fn trimmed(mut coeffs: Vec<Integer>) -> Self {
        let last = coeffs.iter().rposition(|c| *c != 0u32).unwrap_or(0);
        coeffs.truncate(last + 1);
        Self::new(coeffs)
    }
}

impl From<Vec<Integer>> for Poly {
    fn from(coeffs: Vec<Integer>) -> Self {
        Poly::new(coeffs)
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}

fn reduce_coeff(value: &mut Integer, modulus: &Integer) {
    if *modulus != 0u32 {
        value.rem_euc_assign(modulus);
    }
}

/// Convolution product of `a` and `b`, every accumulated coefficient reduced
/// mod `modulus` (unless it is 0), trimmed to the highest non-zero index.
pub fn multiply(a: &Poly, b: &Poly, modulus: &Integer) -> Poly {
    let len = (a.len() + b.len()).saturating_sub(1).max(1);
    let mut c = vec![Integer::new(); len];
    for (i, ai) in a.coeffs.iter().enumerate() {
        if *ai == 0u32 {
            continue;
        }
        for (j, bj) in b.coeffs.iter().enumerate() {
            let k = i + j;
            c[k] += Integer::from(ai * bj);
            reduce_coeff(&mut c[k], modulus);
        }
    }
    Poly::trimmed(c)
}

/// Reduce `a` modulo the binomial x^(degree+1) − q(x), then each coefficient
/// mod `modulus`.
///
/// Terms are rewritten from the highest index downward, so high terms created
/// by the substitution itself are folded in the same pass. The result has
/// exactly `degree + 1` coefficients, zero-padded.
///
/// # Panics
///
/// If `q.degree() > degree` (the substitution would not lower the degree).
pub fn reduce_modulo(a: &Poly, degree: usize, q: &Poly, modulus: &Integer) -> Poly {
    let q_degree = q.degree();
    assert!(
        q_degree <= degree,
        "binomial remainder of degree {} does not fit below x^{}",
        q_degree,
        degree + 1
    );

    let mut b = a.coeffs.clone();
    for i in (degree + 1..b.len()).rev() {
        if b[i] == 0u32 {
            continue;
        }
        let lead = std::mem::take(&mut b[i]);
        for (k, qk) in q.coeffs.iter().enumerate().take(q_degree + 1) {
            // x^i = x^(i-degree-1) · x^(degree+1) ≡ x^(i-degree-1) · q(x)
            b[i - 1 - degree + k] += Integer::from(&lead * qk);
        }
    }

    let mut out: Vec<Integer> = b.into_iter().take(degree + 1).collect();
    out.resize(degree + 1, Integer::new());
    for c in out.iter_mut() {
        reduce_coeff(c, modulus);
    }
    Poly::new(out)
}

/// Raise `a` to `exponent` in Z[x]/(modulus, x^(degree+1) − q(x)) by binary
/// exponentiation.
///
/// A non-positive exponent returns the identity `[1]`.
pub fn power(a: &Poly, exponent: &Integer, modulus: &Integer, degree: usize, q: &Poly) -> Poly {
    let mut base = a.clone();
    let mut acc = Poly::one();
    let mut k = exponent.clone();
    while k > 0u32 {
        if k.is_odd() {
            acc = reduce_modulo(&multiply(&base, &acc, modulus), degree, q, modulus);
            if k == 1u32 {
                break;
            }
        }
        base = reduce_modulo(&multiply(&base, &base, modulus), degree, q, modulus);
        k >>= 1u32;
    }
    acc
}

/// Direct evaluation Σ pᵢ·xⁱ, reduced mod `modulus` unless it is 0.
pub fn evaluate(p: &Poly, x: &Integer, modulus: &Integer) -> Integer {
    let mut sum = Integer::new();
    let mut x_pow = Integer::from(1u32);
    for (i, c) in p.coeffs.iter().enumerate() {
        if i > 0 {
            x_pow *= x;
            reduce_coeff(&mut x_pow, modulus);
        }
        if *c == 0u32 {
            continue;
        }
        sum += Integer::from(c * &x_pow);
    }
    reduce_coeff(&mut sum, modulus);
    sum
}
