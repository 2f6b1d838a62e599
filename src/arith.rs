//! # Arith — Integer Ring Operations
//!
//! The two primitives every other module leans on: modular exponentiation and
//! a normalising modulo that always lands in `[0, n)`. Both work on
//! arbitrary-precision `rug::Integer` values so candidates never have to fit
//! in a machine word.
//!
//! A zero modulus is a contract violation at every call site in this crate
//! (the modulus is always the candidate n ≥ 3), so it surfaces as an
//! `ArithmeticError` instead of being special-cased.

use rug::ops::RemRounding;
use rug::Integer;
use thiserror::Error;

/// Failures of the integer ring primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero: modulus must be positive")]
    DivisionByZero,
    #[error("negative exponent {0} is not supported")]
    NegativeExponent(Integer),
}

/// Compute `base^exponent mod modulus` by square-and-multiply (GMP `mpz_powm`).
///
/// The result is in `[0, modulus)`. An exponent of 0 yields 1 (or 0 when the
/// modulus is 1). A modulus ≤ 0 fails with `DivisionByZero`.
pub fn modpow(
    base: &Integer,
    exponent: &Integer,
    modulus: &Integer,
) -> Result<Integer, ArithmeticError> {
    if *modulus <= 0u32 {
        return Err(ArithmeticError::DivisionByZero);
    }
    if *exponent < 0u32 {
        return Err(ArithmeticError::NegativeExponent(exponent.clone()));
    }
    base.clone()
        .pow_mod(exponent, modulus)
        .map_err(|_| ArithmeticError::DivisionByZero)
}

/// Representative of `a mod n` in `[0, |n|)`.
///
/// Negative `a` wraps to the mathematical residue (−1 mod 7 = 6), and `a == n`
/// maps to 0. Fails with `DivisionByZero` when `n == 0`.
pub fn normalize(a: &Integer, n: &Integer) -> Result<Integer, ArithmeticError> {
    if *n == 0u32 {
        return Err(ArithmeticError::DivisionByZero);
    }
    Ok(a.clone().rem_euc(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from(v)
    }

    // ── modpow ──────────────────────────────────────────────────────

    #[test]
    fn modpow_known_values() {
        assert_eq!(modpow(&int(2), &int(8), &int(9)).unwrap(), 4);
        assert_eq!(modpow(&int(2), &int(12), &int(13)).unwrap(), 1);
        assert_eq!(modpow(&int(3), &int(200), &int(1000)).unwrap(), 1);
    }

    #[test]
    fn modpow_zero_exponent_is_one() {
        assert_eq!(modpow(&int(12345), &int(0), &int(7)).unwrap(), 1);
        assert_eq!(modpow(&int(0), &int(0), &int(7)).unwrap(), 1);
    }

    #[test]
    fn modpow_modulus_one_is_zero() {
        assert_eq!(modpow(&int(5), &int(3), &int(1)).unwrap(), 0);
    }

    #[test]
    fn modpow_negative_base_lands_in_range() {
        // (-2)^3 = -8 ≡ 5 (mod 13)
        assert_eq!(modpow(&int(-2), &int(3), &int(13)).unwrap(), 5);
    }

    #[test]
    fn modpow_huge_exponent() {
        // Fermat: 2^(p-1) ≡ 1 (mod p) for the Mersenne prime 2^127 - 1
        let p = (Integer::from(1u32) << 127u32) - 1u32;
        let e = Integer::from(&p - 1u32);
        assert_eq!(modpow(&int(2), &e, &p).unwrap(), 1);
    }

    #[test]
    fn modpow_zero_modulus_fails() {
        assert_eq!(
            modpow(&int(2), &int(3), &int(0)),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            modpow(&int(2), &int(3), &int(-5)),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn modpow_negative_exponent_fails() {
        assert_eq!(
            modpow(&int(2), &int(-1), &int(7)),
            Err(ArithmeticError::NegativeExponent(int(-1)))
        );
    }

    // ── normalize ───────────────────────────────────────────────────

    #[test]
    fn normalize_positive_and_negative() {
        assert_eq!(normalize(&int(17), &int(5)).unwrap(), 2);
        assert_eq!(normalize(&int(-1), &int(7)).unwrap(), 6);
        assert_eq!(normalize(&int(-14), &int(7)).unwrap(), 0);
        assert_eq!(normalize(&int(-15), &int(7)).unwrap(), 6);
        assert_eq!(normalize(&int(3), &int(7)).unwrap(), 3);
    }

    #[test]
    fn normalize_equal_to_modulus_is_zero() {
        assert_eq!(normalize(&int(7), &int(7)).unwrap(), 0);
        assert_eq!(normalize(&int(-7), &int(7)).unwrap(), 0);
    }

    #[test]
    fn normalize_zero_modulus_fails() {
        assert_eq!(
            normalize(&int(3), &int(0)),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let n = int(97);
        for a in -300..300 {
            let once = normalize(&int(a), &n).unwrap();
            let twice = normalize(&once, &n).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for a={}", a);
            assert!(once >= 0 && once < n);
        }
    }
}
