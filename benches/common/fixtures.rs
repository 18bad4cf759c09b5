// ABOUTME: Seeded generators of athletes and labeled training rows for benchmarks
// ABOUTME: Uses ChaCha8 so every benchmark run sees identical data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_coach::intelligence::{Dataset, FeatureVector, LabeledExample};
use pierre_coach::models::BiometricInput;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Seed shared by every fixture
const FIXTURE_SEED: u64 = 42;

/// Batch sizes for inference benchmarks
#[derive(Debug, Clone, Copy)]
pub enum AthleteBatchSize {
    /// 10 athletes
    Small,
    /// 100 athletes
    Medium,
    /// 1000 athletes
    Large,
}

impl AthleteBatchSize {
    pub const fn count(self) -> usize {
        match self {
            Self::Small => 10,
            Self::Medium => 100,
            Self::Large => 1000,
        }
    }
}

/// Onboarding-style inputs across a realistic spread of body metrics
pub fn generate_athletes(size: AthleteBatchSize) -> Vec<BiometricInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(FIXTURE_SEED);
    (0..size.count())
        .map(|_| {
            BiometricInput::new(
                f64::from(rng.gen_range(18_u32..65)),
                rng.gen_range(50.0..110.0),
                rng.gen_range(150.0..195.0),
                rng.gen_range(48.0..80.0),
                rng.gen_range(0..=6),
            )
        })
        .collect()
}

/// Labeled rows where frequent trainers with low resting heart rate are experts
pub fn generate_dataset(rows: usize) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(FIXTURE_SEED);
    let examples = (0..rows)
        .map(|_| {
            let level: u8 = rng.gen_range(1..=3);
            let (workouts, resting) = match level {
                3 => (rng.gen_range(4_u32..=5), rng.gen_range(48.0..58.0)),
                2 => (rng.gen_range(3_u32..=4), rng.gen_range(56.0..68.0)),
                _ => (rng.gen_range(2_u32..=3), rng.gen_range(62.0..75.0)),
            };
            let height_m: f64 = rng.gen_range(1.50..1.95);
            let weight_kg: f64 = rng.gen_range(50.0..110.0);

            LabeledExample {
                features: FeatureVector::from_array([
                    f64::from(rng.gen_range(18_u32..60)),
                    weight_kg,
                    height_m,
                    resting,
                    f64::from(rng.gen_range(160_u32..200)),
                    f64::from(workouts),
                    weight_kg / (height_m * height_m),
                ]),
                level,
            }
        })
        .collect();
    Dataset::from_examples(examples)
}
