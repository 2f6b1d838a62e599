//! Property-based tests for the Shunia test's mathematical primitives.
//!
//! These tests use the `proptest` framework to check invariants across
//! randomly generated inputs: the ring helpers, the polynomial engine, the
//! Miller–Rabin oracle, and the full decision procedure against GMP.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```
//!
//! Each property is named `prop_<function>_<invariant>`.

use proptest::prelude::*;
use rug::integer::IsPrime;
use rug::Integer;
use shunia::arith::{modpow, normalize};
use shunia::miller_rabin::heuristic_is_prime_u64;
use shunia::poly::{evaluate, multiply, power, reduce_modulo, Poly};
use shunia::ShuniaConfig;

fn gmp_is_prime(n: u64) -> bool {
    Integer::from(n).is_probably_prime(30) != IsPrime::No
}

fn naive_power(a: &Poly, k: u32, modulus: &Integer, degree: usize, q: &Poly) -> Poly {
    let mut acc = Poly::one();
    for _ in 0..k {
        acc = reduce_modulo(&multiply(&acc, a, modulus), degree, q, modulus);
    }
    acc
}

fn modulus_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), 2i64..5000]
}

// == Integer ring ops ==========================================================

proptest! {
    /// normalize(normalize(a, n), n) == normalize(a, n), always in [0, n).
    #[test]
    fn prop_normalize_idempotent_and_in_range(
        a in any::<i64>(),
        n in 1i64..1_000_000,
    ) {
        let n = Integer::from(n);
        let once = normalize(&Integer::from(a), &n).unwrap();
        let twice = normalize(&once, &n).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(once >= 0 && once < n);
        // congruent to the input
        prop_assert!(Integer::from(Integer::from(a) - &once).is_divisible(&n));
    }

    /// modpow agrees with schoolbook square-and-multiply in u128.
    #[test]
    fn prop_modpow_matches_u128(
        base in 0u64..1_000_000,
        exp in 0u64..10_000,
        modulus in 1u64..1_000_000,
    ) {
        let mut expected: u128 = 1 % modulus as u128;
        let mut b = base as u128 % modulus as u128;
        let mut e = exp;
        while e > 0 {
            if e & 1 == 1 {
                expected = expected * b % modulus as u128;
            }
            b = b * b % modulus as u128;
            e >>= 1;
        }
        let got = modpow(&Integer::from(base), &Integer::from(exp), &Integer::from(modulus)).unwrap();
        prop_assert_eq!(got, Integer::from(expected));
    }
}

// == Polynomial engine =========================================================

proptest! {
    /// evaluate(p, 1, m) is the coefficient sum reduced mod m.
    #[test]
    fn prop_evaluate_at_one_is_coefficient_sum(
        coeffs in prop::collection::vec(-1000i64..1000, 1..12),
        m in 1i64..10_000,
    ) {
        let p = Poly::from_coeffs(&coeffs);
        let sum: i64 = coeffs.iter().sum();
        let expected = Integer::from(sum.rem_euclid(m));
        prop_assert_eq!(evaluate(&p, &Integer::from(1), &Integer::from(m)), expected);
    }

    /// Binary exponentiation equals k naive multiply-then-reduce steps.
    #[test]
    fn prop_power_matches_naive(
        coeffs in prop::collection::vec(0i64..50, 1..5),
        k in 0u32..24,
        degree in 1usize..5,
        c in 1i64..5,
        m in modulus_strategy(),
    ) {
        let a = Poly::from_coeffs(&coeffs);
        let q = Poly::from_coeffs(&[c]);
        let m = Integer::from(m);
        let fast = power(&a, &Integer::from(k), &m, degree, &q);
        let slow = naive_power(&a, k, &m, degree, &q);
        prop_assert!(fast.ring_eq(&slow, &m), "k={} fast={} slow={}", k, fast, slow);
    }

    /// Exact products have degree deg(a) + deg(b) and commute.
    #[test]
    fn prop_multiply_degree_and_commutativity(
        a in prop::collection::vec(-20i64..20, 1..8),
        b in prop::collection::vec(-20i64..20, 1..8),
        lead_a in 1i64..20,
        lead_b in 1i64..20,
    ) {
        let mut a = a;
        let mut b = b;
        a.push(lead_a);
        b.push(lead_b);
        let pa = Poly::from_coeffs(&a);
        let pb = Poly::from_coeffs(&b);
        let zero = Integer::new();
        let ab = multiply(&pa, &pb, &zero);
        prop_assert_eq!(ab.degree(), pa.degree() + pb.degree());
        prop_assert_eq!(ab.len(), ab.degree() + 1);
        prop_assert_eq!(ab, multiply(&pb, &pa, &zero));
    }

    /// reduce_modulo always returns degree + 1 coefficients in [0, m).
    #[test]
    fn prop_reduce_output_shape(
        coeffs in prop::collection::vec(-500i64..500, 1..20),
        degree in 0usize..6,
        c in -3i64..4,
        m in 2i64..1000,
    ) {
        let m = Integer::from(m);
        let r = reduce_modulo(&Poly::from_coeffs(&coeffs), degree, &Poly::from_coeffs(&[c]), &m);
        prop_assert_eq!(r.len(), degree + 1);
        for coeff in r.coeffs() {
            prop_assert!(*coeff >= 0 && *coeff < m);
        }
    }

    /// Reduction is a ring homomorphism: reducing a product equals reducing
    /// the product of the reduced factors.
    #[test]
    fn prop_reduce_respects_multiplication(
        a in prop::collection::vec(0i64..100, 1..8),
        b in prop::collection::vec(0i64..100, 1..8),
        degree in 1usize..4,
        m in 2i64..500,
    ) {
        let m = Integer::from(m);
        let q = Poly::from_coeffs(&[2]);
        let pa = Poly::from_coeffs(&a);
        let pb = Poly::from_coeffs(&b);
        let direct = reduce_modulo(&multiply(&pa, &pb, &m), degree, &q, &m);
        let ra = reduce_modulo(&pa, degree, &q, &m);
        let rb = reduce_modulo(&pb, degree, &q, &m);
        let via = reduce_modulo(&multiply(&ra, &rb, &m), degree, &q, &m);
        prop_assert!(direct.ring_eq(&via, &m));
    }
}

// == Miller–Rabin oracle and decision procedure ================================

proptest! {
    /// The heuristic oracle agrees with GMP well inside its deterministic range.
    #[test]
    fn prop_heuristic_matches_gmp(n in 0u64..5_000_000) {
        prop_assert_eq!(heuristic_is_prime_u64(n), gmp_is_prime(n), "n={}", n);
    }

    /// Both presets agree with GMP for every integer below 200000.
    #[test]
    fn prop_shunia_matches_gmp(n in 0u64..200_000) {
        let expected = gmp_is_prime(n);
        for config in [ShuniaConfig::positional(), ShuniaConfig::sum_at_one()] {
            prop_assert_eq!(config.is_prime(&Integer::from(n)).unwrap(), expected, "{} n={}", config, n);
        }
    }

    /// Products of two odd primes are never accepted.
    #[test]
    fn prop_shunia_rejects_semiprimes(
        p_idx in 0usize..12,
        q_idx in 0usize..12,
    ) {
        let primes = [101u64, 103, 107, 109, 113, 127, 131, 1009, 1013, 7919, 65537, 104_729];
        let n = Integer::from(primes[p_idx]) * primes[q_idx];
        for config in [ShuniaConfig::positional(), ShuniaConfig::sum_at_one()] {
            prop_assert!(!config.is_prime(&n).unwrap(), "{} accepted {}", config, n);
        }
    }
}
