//! Codec benchmark suite.
//!
//! Benchmarks JSON and XML encoding/decoding at different form sizes:
//! - Field counts: 10, 100, 1000
//!
//! Run with: cargo bench --bench codec
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use formexpo::codec;
use formexpo::{FieldRecord, FormRecord};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const FIELD_COUNTS: &[usize] = &[10, 100, 1000];

// ============================================================================
// Fixtures
// ============================================================================

/// Builds a form with `count` fields, mixing text and checkbox controls.
fn form_with_fields(count: usize) -> FormRecord {
    (0..count).fold(FormRecord::new("bench"), |form, i| {
        let field = if i % 5 == 0 {
            FieldRecord::new("checkbox", i).with_value("true")
        } else {
            FieldRecord::new("text", i).with_value(format!("value <{i}> & \"more\""))
        };
        form.with_input(field.with_name(format!("field-{i}")))
    })
}

// ============================================================================
// Benchmark: Encode
// ============================================================================

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for &count in FIELD_COUNTS {
        let form = form_with_fields(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("json", count), &form, |b, form| {
            b.iter(|| codec::to_json(black_box(form)))
        });
        group.bench_with_input(BenchmarkId::new("xml", count), &form, |b, form| {
            b.iter(|| codec::to_xml(black_box(form)))
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Decode
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &count in FIELD_COUNTS {
        let form = form_with_fields(count);
        let json = codec::to_json(&form).expect("encode json");
        let xml = codec::to_xml(&form);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("json", count), &json, |b, text| {
            b.iter(|| codec::from_json(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("xml", count), &xml, |b, text| {
            b.iter(|| codec::from_xml(black_box(text)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
