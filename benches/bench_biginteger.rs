use std::hint::black_box;
use std::str::FromStr;

use bigdec::{BigInteger, KARATSUBA_THRESHOLD};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

fn random_words(rng: &mut XorShiftRng, len: usize) -> BigInteger {
    let mut words: Vec<u32> = (0..len).map(|_| rng.random()).collect();
    if let Some(top) = words.last_mut() {
        *top |= 1 << 31;
    }
    BigInteger::from_words_le(&words)
}

fn bench_multiplication(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(7);
    let mut group = c.benchmark_group("biginteger_multiplication");
    for words in [4, KARATSUBA_THRESHOLD / 2, KARATSUBA_THRESHOLD * 2, KARATSUBA_THRESHOLD * 8] {
        let x = random_words(&mut rng, words);
        let y = random_words(&mut rng, words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| black_box(black_box(&x) * black_box(&y)));
        });
    }
    group.finish();
}

fn bench_square(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(11);
    let x = random_words(&mut rng, KARATSUBA_THRESHOLD * 2);
    c.bench_function("biginteger_square", |b| {
        b.iter(|| black_box(black_box(&x).square()));
    });
}

fn bench_division(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(13);
    let mut group = c.benchmark_group("biginteger_division");
    for (n, d) in [(4usize, 1usize), (16, 8), (128, 64)] {
        let x = random_words(&mut rng, n);
        let y = random_words(&mut rng, d);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}/{}", n, d)), &n, |b, _| {
            b.iter(|| black_box(black_box(&x).try_div_rem(black_box(&y)).unwrap()));
        });
    }
    group.finish();
}

fn bench_mod_pow(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(17);
    let base = random_words(&mut rng, 32);
    let exponent = random_words(&mut rng, 32);
    let odd = random_words(&mut rng, 32) | BigInteger::one();
    let even = odd.clone() + BigInteger::one();
    c.bench_function("biginteger_mod_pow_1024_odd", |b| {
        b.iter(|| black_box(base.mod_pow(black_box(&exponent), &odd).unwrap()));
    });
    c.bench_function("biginteger_mod_pow_1024_even", |b| {
        b.iter(|| black_box(base.mod_pow(black_box(&exponent), &even).unwrap()));
    });
}

fn bench_mod_inverse(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(19);
    let m = random_words(&mut rng, 16) | BigInteger::one();
    let a = random_words(&mut rng, 15);
    c.bench_function("biginteger_mod_inverse_512", |b| {
        b.iter(|| black_box(black_box(&a).mod_inverse(&m)));
    });
}

fn bench_gcd(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(23);
    let x = random_words(&mut rng, 32);
    let y = random_words(&mut rng, 32);
    c.bench_function("biginteger_gcd_1024", |b| {
        b.iter(|| black_box(black_box(&x).gcd(black_box(&y))));
    });
}

fn bench_parsing(c: &mut Criterion) {
    let text = "-".to_string() + &"1234567890".repeat(10);
    c.bench_function("biginteger_parsing_100_digits", |b| {
        b.iter(|| black_box(BigInteger::from_str(black_box(&text)).unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    let x = BigInteger::from_str(&"9876543210".repeat(10)).unwrap();
    c.bench_function("biginteger_formatting_100_digits", |b| {
        b.iter(|| black_box(black_box(&x).to_string()));
    });
}

criterion_group!(
    benches,
    bench_multiplication,
    bench_square,
    bench_division,
    bench_mod_pow,
    bench_mod_inverse,
    bench_gcd,
    bench_parsing,
    bench_formatting,
);

criterion_main!(benches);
