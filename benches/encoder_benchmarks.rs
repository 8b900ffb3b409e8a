//! Criterion benchmarks for the entry encoder

use bracket_log::encoder::{
    bracket_time_formatter, plain_level_formatter, EncoderConfig, TextEncoder,
};
use bracket_log::{Entry, Field, FieldValue, LogLevel};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

fn encoder() -> TextEncoder {
    let config = EncoderConfig {
        encode_time: Some(bracket_time_formatter("%Y-%m-%d %H:%M:%S%.3f")),
        encode_level: Some(plain_level_formatter(true, true)),
        ..EncoderConfig::default()
    };
    TextEncoder::new(Arc::new(config))
}

fn bench_encode_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_entry");
    group.throughput(Throughput::Elements(1));

    let base = encoder();

    let bare = Entry::new(LogLevel::Info, "server started");
    group.bench_function("no_fields", |b| {
        b.iter(|| {
            let line = base.clone().encode_entry(black_box(&bare)).unwrap();
            black_box(line.len())
        });
    });

    let fielded = Entry::new(LogLevel::Info, "request handled")
        .with_field(Field::new("status", 200))
        .with_field(Field::new("path", "/api/v1/items"))
        .with_field(Field::new("cached", false))
        .with_field(Field::new("elapsed_ms", 12.5f64));
    group.bench_function("four_fields", |b| {
        b.iter(|| {
            let line = base.clone().encode_entry(black_box(&fielded)).unwrap();
            black_box(line.len())
        });
    });

    let nested = Entry::new(LogLevel::Debug, "payload").with_field(Field::array(
        "xs",
        (0..16).map(FieldValue::Int).collect(),
    ));
    group.bench_function("nested_array", |b| {
        b.iter(|| {
            let line = base.clone().encode_entry(black_box(&nested)).unwrap();
            black_box(line.len())
        });
    });

    group.finish();
}

fn bench_string_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_escaping");

    let base = encoder();
    let clean = Entry::new(LogLevel::Info, "m")
        .with_field(Field::new("s", "plain ascii text without escapes"));
    let dirty = Entry::new(LogLevel::Info, "m")
        .with_field(Field::new("s", "tabs\tand\nnewlines\u{1}and \"quotes\""));

    group.bench_function("no_escapes", |b| {
        b.iter(|| {
            let line = base.clone().encode_entry(black_box(&clean)).unwrap();
            black_box(line.len())
        });
    });
    group.bench_function("with_escapes", |b| {
        b.iter(|| {
            let line = base.clone().encode_entry(black_box(&dirty)).unwrap();
            black_box(line.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode_entry, bench_string_escaping);
criterion_main!(benches);
