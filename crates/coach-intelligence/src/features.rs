// ABOUTME: Feature engineering from raw biometrics into the classifier's fixed-order vector
// ABOUTME: Derives height in metres, BMI, and Fox-estimated maximum heart rate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use aprender::primitives::Matrix;
use coach_core::constants::fitness_model::{FEATURE_COUNT, FEATURE_NAMES};
use coach_core::constants::physiology::{CM_PER_METRE, FOX_MAX_HR_BASE};
use coach_core::errors::ModelError;
use coach_core::models::BiometricInput;
use serde::{Deserialize, Serialize};

/// Ordered feature tuple consumed by the fitness model.
///
/// Layout follows [`FEATURE_NAMES`]:
/// `[age, weight_kg, height_m, resting_bpm, max_bpm, workouts_per_week, bmi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap values already in canonical order (dataset rows)
    #[must_use]
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Values in canonical order
    #[must_use]
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Feature names in canonical order
    #[must_use]
    pub const fn names() -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }

    /// Look up one feature by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
    }

    /// Whether every component is finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Estimated maximum heart rate component
    #[must_use]
    pub const fn max_bpm(&self) -> f64 {
        self.0[4]
    }

    /// Body-mass index component
    #[must_use]
    pub const fn bmi(&self) -> f64 {
        self.0[6]
    }
}

/// Stateless transform from biometrics to features
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Build the feature vector for one input.
    ///
    /// Never fails: a non-positive height yields a BMI of 0 and ages above
    /// 220 yield a negative `max_bpm`, both passed through unchanged.
    #[must_use]
    pub fn engineer(input: &BiometricInput) -> FeatureVector {
        let height_m = input.height_cm / CM_PER_METRE;
        let bmi = if height_m > 0.0 {
            input.weight_kg / (height_m * height_m)
        } else {
            0.0
        };
        // Fox estimate, matching the Max_BPM column the model was trained on
        let max_bpm = FOX_MAX_HR_BASE - input.age;

        FeatureVector([
            input.age,
            input.weight_kg,
            height_m,
            input.resting_bpm,
            max_bpm,
            f64::from(input.workouts_per_week),
            bmi,
        ])
    }
}

/// Pack rows into the row-major `f32` matrix consumed by the fitting routines
pub(crate) fn feature_matrix<'a, I>(rows: I) -> Result<Matrix<f32>, ModelError>
where
    I: ExactSizeIterator<Item = &'a [f64; FEATURE_COUNT]>,
{
    let n = rows.len();
    let data = rows
        .flat_map(|row| row.iter().map(|value| *value as f32))
        .collect();
    Matrix::from_vec(n, FEATURE_COUNT, data).map_err(ModelError::training)
}

impl From<&BiometricInput> for FeatureVector {
    fn from(input: &BiometricInput) -> Self {
        FeatureEngineer::engineer(input)
    }
}
