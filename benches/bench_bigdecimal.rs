use std::hint::black_box;
use std::str::FromStr;

use bigdec::{BigDecimal, MathContext, RoundingMode};
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_addition(c: &mut Criterion) {
    c.bench_function("bigdecimal_addition", |b| {
        let x = BigDecimal::from_str("123.456789").unwrap();
        let y = BigDecimal::from_str("987.654321").unwrap();
        b.iter(|| black_box(black_box(&x).try_add(black_box(&y)).unwrap()));
    });
}

fn bench_addition_mixed_scale(c: &mut Criterion) {
    c.bench_function("bigdecimal_addition_mixed_scale", |b| {
        let x = BigDecimal::from_str("123.4").unwrap();
        let y = BigDecimal::from_str("0.000000987654321").unwrap();
        b.iter(|| black_box(black_box(&x).try_add(black_box(&y)).unwrap()));
    });
}

fn bench_subtraction(c: &mut Criterion) {
    c.bench_function("bigdecimal_subtraction", |b| {
        let x = BigDecimal::from_str("987.654321").unwrap();
        let y = BigDecimal::from_str("123.456789").unwrap();
        b.iter(|| black_box(black_box(&x).subtract(black_box(&y)).unwrap()));
    });
}

fn bench_multiplication(c: &mut Criterion) {
    c.bench_function("bigdecimal_multiplication", |b| {
        let x = BigDecimal::from_str("123.456789").unwrap();
        let y = BigDecimal::from_str("9.876543").unwrap();
        b.iter(|| black_box(black_box(&x).multiply(black_box(&y)).unwrap()));
    });
}

fn bench_multiplication_wide(c: &mut Criterion) {
    c.bench_function("bigdecimal_multiplication_wide", |b| {
        let x = BigDecimal::from_str(&"7".repeat(200)).unwrap();
        let y = BigDecimal::from_str(&("0.".to_string() + &"3".repeat(200))).unwrap();
        b.iter(|| black_box(black_box(&x).multiply(black_box(&y)).unwrap()));
    });
}

fn bench_division(c: &mut Criterion) {
    c.bench_function("bigdecimal_division_decimal64", |b| {
        let x = BigDecimal::from_str("123.456789").unwrap();
        let y = BigDecimal::from_str("9.876543").unwrap();
        b.iter(|| {
            black_box(
                black_box(&x)
                    .divide_with_context(black_box(&y), &MathContext::DECIMAL64)
                    .unwrap(),
            )
        });
    });
}

fn bench_division_decimal128(c: &mut Criterion) {
    c.bench_function("bigdecimal_division_decimal128", |b| {
        let x = BigDecimal::from(22);
        let y = BigDecimal::from(7);
        b.iter(|| {
            black_box(
                black_box(&x)
                    .divide_with_context(black_box(&y), &MathContext::DECIMAL128)
                    .unwrap(),
            )
        });
    });
}

fn bench_exact_division(c: &mut Criterion) {
    c.bench_function("bigdecimal_exact_division", |b| {
        let x = BigDecimal::from_str("123.45").unwrap();
        let y = BigDecimal::from_str("0.008").unwrap();
        b.iter(|| black_box(black_box(&x).divide(black_box(&y)).unwrap()));
    });
}

fn bench_parsing(c: &mut Criterion) {
    c.bench_function("bigdecimal_parsing", |b| {
        b.iter(|| black_box(BigDecimal::from_str(black_box("123.456789")).unwrap()));
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("bigdecimal_formatting", |b| {
        let d = BigDecimal::from_str("123.456789").unwrap();
        b.iter(|| black_box(format!("{}", d)));
    });
}

fn bench_price_times_quantity(c: &mut Criterion) {
    c.bench_function("bigdecimal_price_times_quantity", |b| {
        let price = BigDecimal::from_str("123.45").unwrap();
        let quantity = BigDecimal::from(1000i64);
        b.iter(|| black_box(black_box(&price) * black_box(&quantity)));
    });
}

fn bench_sum(c: &mut Criterion) {
    c.bench_function("bigdecimal_sum_1000_values", |b| {
        let values: Vec<BigDecimal> = (0..1000)
            .map(|i| BigDecimal::from_str(&format!("{}.{:02}", i, i % 100)).unwrap())
            .collect();
        b.iter(|| black_box(values.iter().sum::<BigDecimal>()));
    });
}

fn bench_rounding(c: &mut Criterion) {
    c.bench_function("bigdecimal_round_to_2_decimals", |b| {
        let d = BigDecimal::from_str("123.456789").unwrap();
        b.iter(|| black_box(black_box(&d).set_scale(2, RoundingMode::HalfEven).unwrap()));
    });
}

fn bench_comparison(c: &mut Criterion) {
    c.bench_function("bigdecimal_comparison", |b| {
        let x = BigDecimal::from_str("123.456789").unwrap();
        let y = BigDecimal::from_str("123.4567890001").unwrap();
        b.iter(|| black_box(black_box(&x).compare_to(black_box(&y))));
    });
}

fn bench_pow(c: &mut Criterion) {
    c.bench_function("bigdecimal_pow_with_context", |b| {
        let d = BigDecimal::from_str("1.05").unwrap();
        let mc = MathContext::DECIMAL64;
        b.iter(|| black_box(black_box(&d).pow_with_context(black_box(10), &mc).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_addition,
    bench_addition_mixed_scale,
    bench_subtraction,
    bench_multiplication,
    bench_multiplication_wide,
    bench_division,
    bench_division_decimal128,
    bench_exact_division,
    bench_parsing,
    bench_formatting,
    bench_price_times_quantity,
    bench_sum,
    bench_rounding,
    bench_comparison,
    bench_pow,
);

criterion_main!(benches);
