pub mod arith;
pub mod candidates;
pub mod config;
pub mod harness;
pub mod miller_rabin;
pub mod poly;
pub mod progress;
pub mod selector;
pub mod shunia;

use rug::Integer;

pub use arith::ArithmeticError;
pub use shunia::{decide, is_prime_shunia, Decision, Reason, ShuniaConfig, Verification};

/// ⌊log₂ n⌋ computed exactly from the bit length; 0 for n ≤ 1.
pub fn floor_log2(n: &Integer) -> u64 {
    if *n <= 1u32 {
        return 0;
    }
    n.significant_bits() as u64 - 1
}

/// Estimate decimal digit count from bit length, avoiding expensive to_string conversion.
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}
