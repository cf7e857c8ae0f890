use criterion::{Criterion, criterion_group, criterion_main};
use bigdec::{BigDecimal, BigInteger};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{hint::black_box, str::FromStr};

// ============================================================================
// JSON Serialization/Deserialization
// ============================================================================

fn bench_bigdecimal_serialize_json(c: &mut Criterion) {
    c.bench_function("bigdecimal_serialize_json", |b| {
        let d = BigDecimal::from_str("123.456789").unwrap();
        b.iter(|| black_box(serde_json::to_string(black_box(&d)).unwrap()));
    });
}

fn bench_bigdecimal_deserialize_json(c: &mut Criterion) {
    c.bench_function("bigdecimal_deserialize_json", |b| {
        let json = r#""123.456789""#;
        b.iter(|| black_box(serde_json::from_str::<BigDecimal>(black_box(json)).unwrap()));
    });
}

fn bench_biginteger_roundtrip_json(c: &mut Criterion) {
    c.bench_function("biginteger_roundtrip_json", |b| {
        let n = BigInteger::from_str(&"1234567890".repeat(8)).unwrap();
        b.iter(|| {
            let json = serde_json::to_string(black_box(&n)).unwrap();
            black_box(serde_json::from_str::<BigInteger>(&json).unwrap())
        });
    });
}

fn bench_rust_decimal_serialize_json(c: &mut Criterion) {
    c.bench_function("rust_decimal_serialize_json", |b| {
        let d = Decimal::from_str_exact("123.456789").unwrap();
        b.iter(|| black_box(serde_json::to_string(&black_box(d)).unwrap()));
    });
}

fn bench_rust_decimal_deserialize_json(c: &mut Criterion) {
    c.bench_function("rust_decimal_deserialize_json", |b| {
        let json = r#""123.456789""#;
        b.iter(|| black_box(serde_json::from_str::<Decimal>(black_box(json)).unwrap()));
    });
}

// ============================================================================
// Struct Serialization
// ============================================================================

#[derive(Serialize, Deserialize)]
struct Ledger {
    account: u64,
    balance: BigDecimal,
    interest: BigDecimal,
    nonce: BigInteger,
}

fn sample_ledger() -> Ledger {
    Ledger {
        account: 42,
        balance: BigDecimal::from_str("1048576.25").unwrap(),
        interest: BigDecimal::from_str("0.0375").unwrap(),
        nonce: BigInteger::from_str("340282366920938463463374607431768211457").unwrap(),
    }
}

fn bench_struct_serialize_json(c: &mut Criterion) {
    c.bench_function("ledger_struct_serialize_json", |b| {
        let ledger = sample_ledger();
        b.iter(|| black_box(serde_json::to_string(black_box(&ledger)).unwrap()));
    });
}

fn bench_struct_deserialize_json(c: &mut Criterion) {
    c.bench_function("ledger_struct_deserialize_json", |b| {
        let json = serde_json::to_string(&sample_ledger()).unwrap();
        b.iter(|| black_box(serde_json::from_str::<Ledger>(black_box(&json)).unwrap()));
    });
}

// ============================================================================
// Binary Serialization
// ============================================================================

fn bench_bigdecimal_serialize_bincode(c: &mut Criterion) {
    c.bench_function("bigdecimal_serialize_bincode", |b| {
        let d = BigDecimal::from_str("123.456789").unwrap();
        b.iter(|| black_box(bincode::serialize(black_box(&d)).unwrap()));
    });
}

fn bench_bigdecimal_deserialize_bincode(c: &mut Criterion) {
    c.bench_function("bigdecimal_deserialize_bincode", |b| {
        let d = BigDecimal::from_str("123.456789").unwrap();
        let bytes = bincode::serialize(&d).unwrap();
        b.iter(|| black_box(bincode::deserialize::<BigDecimal>(black_box(&bytes)).unwrap()));
    });
}

fn bench_struct_roundtrip_bincode(c: &mut Criterion) {
    c.bench_function("ledger_struct_roundtrip_bincode", |b| {
        let ledger = sample_ledger();
        b.iter(|| {
            let bytes = bincode::serialize(black_box(&ledger)).unwrap();
            black_box(bincode::deserialize::<Ledger>(&bytes).unwrap())
        });
    });
}

fn bench_rust_decimal_serialize_bincode(c: &mut Criterion) {
    c.bench_function("rust_decimal_serialize_bincode", |b| {
        let d = Decimal::from_str_exact("123.456789").unwrap();
        b.iter(|| black_box(bincode::serialize(&black_box(d)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_bigdecimal_serialize_json,
    bench_bigdecimal_deserialize_json,
    bench_biginteger_roundtrip_json,
    bench_rust_decimal_serialize_json,
    bench_rust_decimal_deserialize_json,
    bench_struct_serialize_json,
    bench_struct_deserialize_json,
    bench_bigdecimal_serialize_bincode,
    bench_bigdecimal_deserialize_bincode,
    bench_struct_roundtrip_bincode,
    bench_rust_decimal_serialize_bincode,
);

criterion_main!(benches);
