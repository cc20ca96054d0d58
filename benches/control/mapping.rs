//! Benchmarks for pitch table construction and quantized selection.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use handsynth::{ChordTable, Key, NoteTable, Pattern};

pub fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");

    let key: Key = "C major".parse().unwrap();
    group.bench_function("note_table/c_major_1_4", |b| {
        b.iter(|| NoteTable::from_key(black_box(&key), 1..=4))
    });

    let pattern = Pattern::default_progression();
    group.bench_function("chord_table/default_progression", |b| {
        b.iter(|| ChordTable::from_pattern(black_box(&pattern)))
    });

    // Lookup cost is independent of table size; check that holds
    for &high in &[1i8, 4, 8] {
        let table = NoteTable::from_key(&key, 0..=high).unwrap();
        group.bench_with_input(BenchmarkId::new("select", table.len()), &table, |b, table| {
            let mut x = 0.0f32;
            b.iter(|| {
                x = (x + 0.013) % 1.0;
                table.select(black_box(x)).copied()
            })
        });
    }

    group.finish();
}
