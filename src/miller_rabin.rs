//! # Miller–Rabin — Strong Probable-Prime Oracle
//!
//! Single-base strong probable-prime test and a multi-base heuristic built on
//! it. The heuristic serves two callers: the exponent selector (to gate
//! candidate ring degrees, which are tiny) and the batch harness (as the
//! expected verdict when sweeping a numeric range).
//!
//! `heuristic_is_prime` is probabilistic, not a proof. It runs every base in
//! 2..=min(2·(bits+1), n/2) after trial division by the primes up to 19,
//! which is deterministic far beyond any range the harness sweeps.

use rug::Integer;

use crate::arith::modpow;

/// Primes used for the trial-division shortcut in `heuristic_is_prime`.
pub const TRIAL_PRIMES: [u32; 8] = [2, 3, 5, 7, 11, 13, 17, 19];

/// Strong probable-prime test of `n` to a single `base`.
///
/// Writes n−1 = d·2ˢ with d odd and accepts when base^d ≡ ±1 or when one of
/// the next s−1 squarings reaches n−1. Reaching 1 first rejects.
pub fn is_strong_probable_prime(n: &Integer, base: &Integer) -> bool {
    if *n < 2u32 {
        return false;
    }
    let n_minus_1 = Integer::from(n - 1u32);
    let s = n_minus_1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n_minus_1 >> s);

    let Ok(mut m) = modpow(base, &d, n) else {
        return false;
    };
    if m == 1u32 || m == n_minus_1 {
        return true;
    }
    for _ in 1..s {
        m.square_mut();
        m %= n;
        if m == n_minus_1 {
            return true;
        }
        if m == 1u32 {
            return false;
        }
    }
    false
}

/// Number of Miller–Rabin bases `heuristic_is_prime` runs for `n`.
pub fn base_limit(n: &Integer) -> u64 {
    let log2 = n.significant_bits() as u64 + 1;
    let limit = log2 * 2;
    if Integer::from(n >> 1u32) < limit {
        log2
    } else {
        limit
    }
}

/// Trial division by `TRIAL_PRIMES`, then strong probable-prime tests to every
/// base from 2 up to `base_limit(n)`. Stops at the first failing base.
pub fn heuristic_is_prime(n: &Integer) -> bool {
    if *n < 2u32 {
        return false;
    }
    for &p in &TRIAL_PRIMES {
        if n.is_divisible_u(p) {
            return *n == p;
        }
    }
    (2..=base_limit(n)).all(|b| is_strong_probable_prime(n, &Integer::from(b)))
}

/// `heuristic_is_prime` for machine-word values (selector degrees).
pub fn heuristic_is_prime_u64(n: u64) -> bool {
    heuristic_is_prime(&Integer::from(n))
}
