// ABOUTME: Criterion benchmarks for the fitness-score model
// ABOUTME: Measures feature engineering, single and batch inference, and offline training
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the fitness-score model.
//!
//! Inference runs on a model trained once from seeded synthetic rows, so the
//! numbers reflect a realistic weight vector rather than a hand-built one.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::fixtures::{generate_athletes, generate_dataset, AthleteBatchSize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_coach::intelligence::{train, FeatureEngineer, FitnessModel, TrainingConfig};

/// Rows in the dataset used to build the inference model
const MODEL_TRAINING_ROWS: usize = 600;

fn trained_model() -> FitnessModel {
    train(&generate_dataset(MODEL_TRAINING_ROWS), &TrainingConfig::default())
        .expect("synthetic dataset trains")
        .model
}

fn bench_feature_engineering(c: &mut Criterion) {
    let athletes = generate_athletes(AthleteBatchSize::Small);

    c.bench_function("feature_engineering", |b| {
        b.iter(|| {
            for athlete in &athletes {
                black_box(FeatureEngineer::engineer(black_box(athlete)));
            }
        });
    });
}

fn bench_inference(c: &mut Criterion) {
    let model = trained_model();
    let mut group = c.benchmark_group("inference");

    let single = generate_athletes(AthleteBatchSize::Small)[0];
    group.bench_function("single", |b| {
        b.iter(|| model.infer(black_box(&single)));
    });

    for size in [
        AthleteBatchSize::Small,
        AthleteBatchSize::Medium,
        AthleteBatchSize::Large,
    ] {
        let athletes = generate_athletes(size);
        group.throughput(Throughput::Elements(size.count() as u64));
        group.bench_with_input(
            BenchmarkId::new("batch", size.count()),
            &athletes,
            |b, athletes| {
                b.iter(|| model.infer_batch(black_box(athletes)));
            },
        );
    }

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for rows in [200_usize, 1000] {
        let dataset = generate_dataset(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("fit", rows), &dataset, |b, dataset| {
            b.iter(|| train(black_box(dataset), &TrainingConfig::default()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_feature_engineering,
    bench_inference,
    bench_training,
);
criterion_main!(benches);
