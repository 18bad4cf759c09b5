// ABOUTME: Biometric input models for the fitness-score pipeline
// ABOUTME: Lenient boundary payload plus the validated, immutable BiometricInput
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lenient;
use serde::{Deserialize, Serialize};

/// Biometrics for one scoring request.
///
/// Values are trusted as-is: degenerate numbers (zero height, negative age)
/// flow through the feature engineer into defined outputs instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    /// Age in years
    pub age: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimetres
    pub height_cm: f64,
    /// Resting heart rate in beats per minute
    pub resting_bpm: f64,
    /// Workout sessions per week
    pub workouts_per_week: u32,
}

impl BiometricInput {
    /// Create a biometric input
    #[must_use]
    pub const fn new(
        age: f64,
        weight_kg: f64,
        height_cm: f64,
        resting_bpm: f64,
        workouts_per_week: u32,
    ) -> Self {
        Self {
            age,
            weight_kg,
            height_cm,
            resting_bpm,
            workouts_per_week,
        }
    }
}

/// Untyped biometrics as they arrive from clients or LLM extraction.
///
/// Each field accepts a JSON number or a numeric string. Defaulting rules
/// applied by [`RawBiometricPayload::into_input`]:
///
/// - missing or non-numeric `age`, `weight_kg`, `height_cm`, `resting_bpm` become `0.0`
/// - missing or non-numeric `workouts_per_week` becomes `0`; fractional values
///   truncate toward zero and negative values clamp to `0`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBiometricPayload {
    /// Age in years
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub age: Option<f64>,
    /// Body weight in kilograms
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub weight_kg: Option<f64>,
    /// Height in centimetres
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub height_cm: Option<f64>,
    /// Resting heart rate
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub resting_bpm: Option<f64>,
    /// Workout sessions per week
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub workouts_per_week: Option<f64>,
}

impl RawBiometricPayload {
    /// Fields that were absent or not coercible to numbers
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("age", self.age.is_none()),
            ("weight_kg", self.weight_kg.is_none()),
            ("height_cm", self.height_cm.is_none()),
            ("resting_bpm", self.resting_bpm.is_none()),
            ("workouts_per_week", self.workouts_per_week.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    /// Apply the defaulting rules and produce a `BiometricInput`
    #[must_use]
    pub fn into_input(self) -> BiometricInput {
        let workouts = self.workouts_per_week.unwrap_or(0.0).trunc();
        // Saturating cast: NaN never reaches here, negatives clamp to zero
        let workouts_per_week = if workouts > 0.0 { workouts as u32 } else { 0 };

        BiometricInput {
            age: self.age.unwrap_or(0.0),
            weight_kg: self.weight_kg.unwrap_or(0.0),
            height_cm: self.height_cm.unwrap_or(0.0),
            resting_bpm: self.resting_bpm.unwrap_or(0.0),
            workouts_per_week,
        }
    }
}

impl From<RawBiometricPayload> for BiometricInput {
    fn from(raw: RawBiometricPayload) -> Self {
        raw.into_input()
    }
}
