// ABOUTME: Per-feature standardization fitted on the training partition via aprender
// ABOUTME: Population mean and standard deviation with a unit scale for constant features
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::features::{feature_matrix, FeatureVector};
use aprender::preprocessing::StandardScaler as ColumnStandardizer;
use aprender::traits::Transformer;
use coach_core::constants::fitness_model::FEATURE_COUNT;
use coach_core::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Fitted standardizer: `z = (x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Compute mean and population standard deviation of each feature.
    ///
    /// Statistics come from aprender's standardizer in `f32`. A feature whose
    /// deviation is below `f32` resolution gets scale `1.0` so it centres to
    /// zero instead of dividing by rounding noise.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InsufficientData` when `rows` is empty.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::insufficient("cannot fit scaler on zero rows"));
        }

        let matrix = feature_matrix(rows.iter().map(FeatureVector::as_array))?;
        let mut standardizer = ColumnStandardizer::new();
        standardizer
            .fit(&matrix)
            .map_err(|e| ModelError::training(format!("scaler fit failed: {e}")))?;

        let mut mean = [0.0; FEATURE_COUNT];
        let mut scale = [1.0; FEATURE_COUNT];
        let fitted = standardizer.mean().iter().zip(standardizer.std());
        for ((m, s), (fitted_mean, fitted_std)) in mean.iter_mut().zip(&mut scale).zip(fitted) {
            *m = f64::from(*fitted_mean);
            let std = f64::from(*fitted_std);
            if std > f64::from(f32::EPSILON) * m.abs().max(1.0) {
                *s = std;
            }
        }

        Ok(Self { mean, scale })
    }

    /// Rebuild a scaler from persisted parameters.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Incompatible` on wrong dimensions, non-finite
    /// values, or non-positive scales.
    pub fn from_parts(mean: &[f64], scale: &[f64]) -> Result<Self, ModelError> {
        let mean: [f64; FEATURE_COUNT] = mean.try_into().map_err(|_| {
            ModelError::incompatible(format!(
                "scaler mean has {} values, expected {FEATURE_COUNT}",
                mean.len()
            ))
        })?;
        let scale: [f64; FEATURE_COUNT] = scale.try_into().map_err(|_| {
            ModelError::incompatible(format!(
                "scaler scale has {} values, expected {FEATURE_COUNT}",
                scale.len()
            ))
        })?;

        if !mean.iter().all(|v| v.is_finite()) {
            return Err(ModelError::incompatible("scaler mean contains non-finite values"));
        }
        if !scale.iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(ModelError::incompatible(
                "scaler scale must be finite and strictly positive",
            ));
        }

        Ok(Self { mean, scale })
    }

    /// Standardize one feature vector
    #[must_use]
    pub fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut out = *features.as_array();
        for ((v, m), s) in out.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - m) / s;
        }
        out
    }

    /// Standardize many rows
    #[must_use]
    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<[f64; FEATURE_COUNT]> {
        rows.iter().map(|row| self.transform(row)).collect()
    }

    /// Fitted per-feature means
    #[must_use]
    pub const fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    /// Fitted per-feature scales
    #[must_use]
    pub const fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: [f64; FEATURE_COUNT]) -> FeatureVector {
        FeatureVector::from_array(values)
    }

    #[test]
    fn test_population_statistics() {
        let rows = [
            row([20.0, 60.0, 1.6, 50.0, 200.0, 2.0, 23.4]),
            row([40.0, 80.0, 1.8, 70.0, 180.0, 4.0, 24.7]),
        ];
        let scaler = StandardScaler::fit(&rows).unwrap();

        assert!((scaler.mean()[0] - 30.0).abs() < 1e-5);
        // Population std of {20, 40} is 10
        assert!((scaler.scale()[0] - 10.0).abs() < 1e-5);

        let z = scaler.transform(&rows[0]);
        assert!((z[0] + 1.0).abs() < 1e-5);
        assert!((z[4] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_constant_feature_gets_unit_scale() {
        let rows = [
            row([30.0, 70.0, 1.7, 60.0, 190.0, 3.0, 24.0]),
            row([30.0, 75.0, 1.7, 62.0, 190.0, 3.0, 25.9]),
        ];
        let scaler = StandardScaler::fit(&rows).unwrap();

        assert!((scaler.scale()[0] - 1.0).abs() < f64::EPSILON);
        assert!((scaler.scale()[4] - 1.0).abs() < f64::EPSILON);
        assert!(scaler.transform(&rows[0])[0].abs() < 1e-5);
    }

    #[test]
    fn test_empty_and_invalid_parts_rejected() {
        assert!(StandardScaler::fit(&[]).is_err());
        assert!(StandardScaler::from_parts(&[0.0; 6], &[1.0; 7]).is_err());
        let zero_scale = [1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0];
        assert!(StandardScaler::from_parts(&[0.0; 7], &zero_scale).is_err());
        assert!(StandardScaler::from_parts(&[f64::NAN; 7], &[1.0; 7]).is_err());
        assert!(StandardScaler::from_parts(&[0.0; 7], &[1.0; 7]).is_ok());
    }
}
