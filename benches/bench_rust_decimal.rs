//! Head-to-head against `rust_decimal` on the workloads both types cover.

use std::hint::black_box;
use std::str::FromStr;

use bigdec::{BigDecimal, MathContext, RoundingMode};
use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal::prelude::RoundingStrategy;

fn bench_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("addition");
    let (x, y) = ("123.456789", "987.654321");
    let (bx, by) = (BigDecimal::from_str(x).unwrap(), BigDecimal::from_str(y).unwrap());
    let (rx, ry) = (Decimal::from_str(x).unwrap(), Decimal::from_str(y).unwrap());
    group.bench_function("bigdec", |b| b.iter(|| black_box(black_box(&bx) + black_box(&by))));
    group.bench_function("rust_decimal", |b| b.iter(|| black_box(black_box(rx) + black_box(ry))));
    group.finish();
}

fn bench_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiplication");
    let (x, y) = ("123.456789", "9.876543");
    let (bx, by) = (BigDecimal::from_str(x).unwrap(), BigDecimal::from_str(y).unwrap());
    let (rx, ry) = (Decimal::from_str(x).unwrap(), Decimal::from_str(y).unwrap());
    group.bench_function("bigdec", |b| b.iter(|| black_box(black_box(&bx) * black_box(&by))));
    group.bench_function("rust_decimal", |b| b.iter(|| black_box(black_box(rx) * black_box(ry))));
    group.finish();
}

fn bench_division(c: &mut Criterion) {
    // rust_decimal keeps 28 fraction digits; a 28-digit context is the
    // closest match.
    let mut group = c.benchmark_group("division");
    let mc = MathContext::new(28, RoundingMode::HalfEven);
    let (x, y) = ("123.456789", "9.876543");
    let (bx, by) = (BigDecimal::from_str(x).unwrap(), BigDecimal::from_str(y).unwrap());
    let (rx, ry) = (Decimal::from_str(x).unwrap(), Decimal::from_str(y).unwrap());
    group.bench_function("bigdec", |b| {
        b.iter(|| black_box(black_box(&bx).divide_with_context(black_box(&by), &mc).unwrap()))
    });
    group.bench_function("rust_decimal", |b| b.iter(|| black_box(black_box(rx) / black_box(ry))));
    group.finish();
}

fn bench_rounding(c: &mut Criterion) {
    let mut group = c.benchmark_group("round_to_2_decimals");
    let bx = BigDecimal::from_str("123.456789").unwrap();
    let rx = Decimal::from_str("123.456789").unwrap();
    group.bench_function("bigdec", |b| {
        b.iter(|| black_box(black_box(&bx).set_scale(2, RoundingMode::HalfEven).unwrap()))
    });
    group.bench_function("rust_decimal", |b| {
        b.iter(|| black_box(black_box(rx).round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)))
    });
    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.bench_function("bigdec", |b| {
        b.iter(|| black_box(BigDecimal::from_str(black_box("123.456789")).unwrap()))
    });
    group.bench_function("rust_decimal", |b| {
        b.iter(|| black_box(Decimal::from_str(black_box("123.456789")).unwrap()))
    });
    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let bx = BigDecimal::from_str("123.456789").unwrap();
    let rx = Decimal::from_str("123.456789").unwrap();
    group.bench_function("bigdec", |b| b.iter(|| black_box(format!("{}", bx))));
    group.bench_function("rust_decimal", |b| b.iter(|| black_box(format!("{}", rx))));
    group.finish();
}

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_1000_values");
    let text: Vec<String> = (0..1000).map(|i| format!("{}.{:02}", i, i % 100)).collect();
    let big: Vec<BigDecimal> = text.iter().map(|s| BigDecimal::from_str(s).unwrap()).collect();
    let fixed: Vec<Decimal> = text.iter().map(|s| Decimal::from_str(s).unwrap()).collect();
    group.bench_function("bigdec", |b| b.iter(|| black_box(big.iter().sum::<BigDecimal>())));
    group.bench_function("rust_decimal", |b| b.iter(|| black_box(fixed.iter().copied().sum::<Decimal>())));
    group.finish();
}

criterion_group!(
    benches,
    bench_addition,
    bench_multiplication,
    bench_division,
    bench_rounding,
    bench_parsing,
    bench_formatting,
    bench_sum,
);

criterion_main!(benches);
