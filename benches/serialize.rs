//! Result set serialization benchmarks
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sqlutil::{rows_to_csv, rows_to_json, MemoryRows, NamedQuery, Value};

/// Build a cursor with N rows of (id, name, score, payload)
fn create_rows(num_rows: usize) -> MemoryRows {
    let columns = ["id", "name", "score", "payload"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    let rows = (0..num_rows)
        .map(|i| {
            vec![
                Value::from(i as i64),
                Value::from(format!("name-{}", i)),
                Value::from(i as f64 * 1.5),
                Value::from(vec![(i % 256) as u8; 16]),
            ]
        })
        .collect();

    MemoryRows::new(columns, rows)
}

fn bench_rows_to_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows_to_json");

    for num_rows in [4, 1_000, 10_000] {
        let rows = create_rows(num_rows);
        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_rows), &rows, |b, rows| {
            let mut buf = Vec::with_capacity(1024);
            b.iter(|| {
                let mut rows = rows.clone();
                buf.clear();
                buf = rows_to_json(std::mem::take(&mut buf), &mut rows).unwrap();
                black_box(buf.len())
            })
        });
    }

    group.finish();
}

fn bench_rows_to_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows_to_csv");

    for num_rows in [4, 1_000, 10_000] {
        let rows = create_rows(num_rows);
        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_rows), &rows, |b, rows| {
            let mut buf = Vec::with_capacity(1024);
            b.iter(|| {
                let mut rows = rows.clone();
                buf.clear();
                buf = rows_to_csv(std::mem::take(&mut buf), &mut rows).unwrap();
                black_box(buf.len())
            })
        });
    }

    group.finish();
}

fn bench_parse_named_query(c: &mut Criterion) {
    c.bench_function("parse_named_query", |b| {
        b.iter(|| {
            NamedQuery::parse(black_box(
                "select * from items where id = :id and test = :test",
            ))
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_rows_to_json,
    bench_rows_to_csv,
    bench_parse_named_query
);
criterion_main!(benches);
