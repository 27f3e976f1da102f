//! Microbenchmarks for admission and the document codec.
//!
//! Admission scans every stored entry for an occupied slot, so cost grows
//! with history size. These benches track that against a year of 10 minute
//! readouts.
//!
//! Run with: `cargo bench -p sensorlog -- append`

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sensorlog::{Readout, Store};

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Builds a store holding `count` consecutive 10 minute readouts.
fn populated_store(count: i64) -> Store {
    let mut store = Store::new(10);
    for i in 0..count {
        let ts = base_time() + TimeDelta::minutes(10 * i);
        store.append(Readout::with_timestamp(20.0, 50.0, 1000.0, ts));
    }
    store
}

fn bench_valid_readout(c: &mut Criterion) {
    let mut group = c.benchmark_group("append/valid_readout");

    for count in [144_i64, 1_008, 52_560] {
        let store = populated_store(count);
        let fresh = Readout::with_timestamp(
            20.0,
            50.0,
            1000.0,
            base_time() + TimeDelta::minutes(10 * count),
        );

        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            b.iter(|| store.valid_readout(black_box(&fresh)));
        });
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let store = populated_store(1_008);

    c.bench_function("append/document_round_trip_week", |b| {
        b.iter(|| {
            let document = store.to_json();
            let mut restored = Store::new(10);
            black_box(restored.deserialize(black_box(&document)));
        });
    });
}

criterion_group!(benches, bench_valid_readout, bench_round_trip);
criterion_main!(benches);
