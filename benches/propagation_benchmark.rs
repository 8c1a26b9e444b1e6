//! Propagation Performance Benchmarks
//!
//! Measures the per-request cost of B3 extraction, injection and the
//! identifier codec.

use b3_propagation::propagation::{from_hex, to_hex, B3Propagator, Id128, TraceContext};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;

/// Benchmark trace context extraction from headers
fn bench_extract(c: &mut Criterion) {
    let propagator = B3Propagator::default();
    let mut headers = HashMap::new();
    headers.insert(
        "X-B3-TraceId".to_string(),
        "0af7651916cd43dd8448eb211c80319c".to_string(),
    );
    headers.insert("X-B3-SpanId".to_string(), "b7ad6b7169203331".to_string());
    headers.insert("X-B3-Sampled".to_string(), "1".to_string());
    headers.insert("baggage-user".to_string(), "alice".to_string());
    headers.insert("content-type".to_string(), "application/json".to_string());

    c.bench_function("b3_extract", |b| {
        b.iter(|| {
            let _ = black_box(propagator.extract(black_box(&headers)));
        });
    });
}

/// Benchmark trace context injection into headers
fn bench_inject(c: &mut Criterion) {
    let propagator = B3Propagator::default();
    let context = TraceContext::new(
        Id128::new(0x0af7651916cd43dd, 0x8448eb211c80319c),
        Id128::new(0, 0xb7ad6b7169203331),
        true,
    )
    .with_baggage_item("user", "alice");

    c.bench_function("b3_inject", |b| {
        b.iter(|| {
            let mut headers: Vec<(String, String)> = Vec::with_capacity(4);
            propagator.inject(black_box(&context), &mut headers);
            black_box(headers);
        });
    });
}

/// Benchmark the identifier codec for 64 and 128-bit ids
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("id_codec");

    for (name, hex) in [
        ("64bit", "b7ad6b7169203331"),
        ("128bit", "0af7651916cd43dd8448eb211c80319c"),
    ] {
        group.bench_with_input(BenchmarkId::new("from_hex", name), &hex, |b, hex| {
            b.iter(|| black_box(from_hex(black_box(hex))));
        });

        let Ok(id) = from_hex(hex) else { continue };
        group.bench_with_input(BenchmarkId::new("to_hex", name), &id, |b, id| {
            b.iter(|| black_box(to_hex(black_box(*id))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_inject, bench_codec);
criterion_main!(benches);
