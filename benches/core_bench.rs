use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rug::Integer;
use shunia::poly::{multiply, power, Poly};
use shunia::ShuniaConfig;

fn mersenne(p: u32) -> Integer {
    (Integer::from(1u32) << p) - 1u32
}

fn bench_shunia_m127(c: &mut Criterion) {
    let prime = mersenne(127);
    for config in [ShuniaConfig::positional(), ShuniaConfig::sum_at_one()] {
        c.bench_function(&format!("shunia(M127, {})", config), |b| {
            b.iter(|| config.is_prime(black_box(&prime)).unwrap());
        });
    }
}

fn bench_shunia_m521(c: &mut Criterion) {
    let prime = mersenne(521);
    let config = ShuniaConfig::positional();
    c.bench_function("shunia(M521, positional)", |b| {
        b.iter(|| config.is_prime(black_box(&prime)).unwrap());
    });
}

fn bench_shunia_fermat_reject(c: &mut Criterion) {
    // 2^128 + 1 fails the Fermat step
    let composite = (Integer::from(1u32) << 128u32) + 1u32;
    let config = ShuniaConfig::positional();
    c.bench_function("shunia(2^128+1) fermat reject", |b| {
        b.iter(|| config.is_prime(black_box(&composite)).unwrap());
    });
}

fn bench_poly_power(c: &mut Criterion) {
    let n = mersenne(127);
    let base = Poly::from_coeffs(&[1u32, 1]);
    let q = Poly::from_coeffs(&[2u32]);
    c.bench_function("poly power (1+x)^M127 mod (M127, x^13-2)", |b| {
        b.iter(|| power(black_box(&base), &n, &n, 12, &q));
    });
}

fn bench_poly_multiply(c: &mut Criterion) {
    let n = mersenne(127);
    let a = Poly::new((1..=16u32).map(|i| Integer::from(&n - i)).collect());
    c.bench_function("poly multiply 16x16 mod M127", |b| {
        b.iter(|| multiply(black_box(&a), black_box(&a), &n));
    });
}

criterion_group!(
    benches,
    bench_shunia_m127,
    bench_shunia_m521,
    bench_shunia_fermat_reject,
    bench_poly_power,
    bench_poly_multiply,
);
criterion_main!(benches);
