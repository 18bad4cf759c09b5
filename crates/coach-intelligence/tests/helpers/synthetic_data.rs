// ABOUTME: Synthetic gym-member dataset generator for training and inference tests
// ABOUTME: Seeded ChaCha8 RNG so every run sees the same rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use coach_intelligence::{Dataset, FeatureVector, LabeledExample};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::fmt::Write as _;

/// CSV header in the column order of the public gym-members dataset
pub const GYM_HEADER: &str = "Age,Gender,Weight (kg),Height (m),Max_BPM,Avg_BPM,Resting_BPM,Session_Duration (hours),Calories_Burned,Workout_Type,Fat_Percentage,Water_Intake (liters),Workout_Frequency (days/week),Experience_Level,BMI";

/// One generated member
#[derive(Debug, Clone, Copy)]
pub struct GymMember {
    pub age: f64,
    pub weight_kg: f64,
    pub height_m: f64,
    pub resting_bpm: f64,
    pub max_bpm: f64,
    pub workouts_per_week: f64,
    pub bmi: f64,
    pub level: u8,
}

/// Deterministic generator of gym members across the three experience levels
pub struct GymMemberGenerator {
    rng: ChaCha8Rng,
}

impl GymMemberGenerator {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Experts train more often with lower resting heart rate; the rest overlap
    pub fn member(&mut self) -> GymMember {
        let level: u8 = self.rng.gen_range(1..=3);
        let (frequency, resting) = match level {
            3 => (self.rng.gen_range(4_u32..=5), self.rng.gen_range(48.0..58.0)),
            2 => (self.rng.gen_range(3_u32..=4), self.rng.gen_range(56.0..68.0)),
            _ => (self.rng.gen_range(2_u32..=3), self.rng.gen_range(62.0..75.0)),
        };
        let age: f64 = f64::from(self.rng.gen_range(18_u32..60));
        let height_m: f64 = self.rng.gen_range(1.50..1.95);
        let weight_kg: f64 = self.rng.gen_range(50.0..110.0);

        GymMember {
            age,
            weight_kg,
            height_m,
            resting_bpm: resting,
            max_bpm: f64::from(self.rng.gen_range(160_u32..200)),
            workouts_per_week: f64::from(frequency),
            bmi: weight_kg / (height_m * height_m),
            level,
        }
    }

    pub fn members(&mut self, count: usize) -> Vec<GymMember> {
        (0..count).map(|_| self.member()).collect()
    }
}

impl GymMember {
    pub fn example(&self) -> LabeledExample {
        LabeledExample {
            features: FeatureVector::from_array([
                self.age,
                self.weight_kg,
                self.height_m,
                self.resting_bpm,
                self.max_bpm,
                self.workouts_per_week,
                self.bmi,
            ]),
            level: self.level,
        }
    }
}

/// In-memory dataset of `count` members
pub fn gym_dataset(count: usize, seed: u64) -> Dataset {
    let members = GymMemberGenerator::new(seed).members(count);
    Dataset::from_examples(members.iter().map(GymMember::example).collect())
}

/// CSV text with extra columns the trainer must ignore
pub fn gym_csv(count: usize, seed: u64) -> String {
    let mut out = String::from(GYM_HEADER);
    out.push('\n');
    for m in GymMemberGenerator::new(seed).members(count) {
        writeln!(
            out,
            "{},Other,{},{},{},150,{},1.2,900,Cardio,20.0,2.5,{},{},{}",
            m.age,
            m.weight_kg,
            m.height_m,
            m.max_bpm,
            m.resting_bpm,
            m.workouts_per_week,
            m.level,
            m.bmi
        )
        .unwrap();
    }
    out
}
