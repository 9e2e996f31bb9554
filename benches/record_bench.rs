//! Benchmarks for verify record decoding and interpretation.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench record_bench
//! ```

use anviz_protocol::{VerifyRecord, decode_employee_id, interpret};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Benchmark each branch of the employee id recovery.
fn bench_employee_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("employee_id");

    let cases: [(&str, [u8; 5]); 3] = [
        ("numeric", [0x39, 0x30, 0x00, 0x00, 0x00]),
        ("ascii", *b"EMP07"),
        ("hex", [0xFF; 5]),
    ];

    for (name, raw) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &raw, |b, raw| {
            b.iter(|| black_box(decode_employee_id(black_box(raw))));
        });
    }

    group.finish();
}

/// Benchmark decoding plus interpretation of a full record.
fn bench_decode_and_interpret(c: &mut Criterion) {
    let payload = [
        0x39, 0x30, 0x00, 0x00, 0x00, 0x10, 0x0E, 0x00, 0x00, 0x10, 0x81, 0x00, 0x00, 0x00,
    ];

    c.bench_function("decode_and_interpret", |b| {
        b.iter(|| {
            let record = VerifyRecord::decode(black_box(&payload)).unwrap();
            black_box(interpret(&record));
        });
    });
}

criterion_group!(benches, bench_employee_id, bench_decode_and_interpret);
criterion_main!(benches);
