// ABOUTME: Offline training job producing the fitness model artifacts
// ABOUTME: Seeded holdout split, scaler and classifier fit, accuracy report, and fingerprinting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Training
//!
//! ```text
//! CSV -> Dataset -> train_test_split(seed) -> train / holdout
//!     -> StandardScaler::fit(train) -> LogisticClassifier::fit(scaled train)
//!     -> holdout accuracy -> ModelArtifacts (atomic write)
//! ```
//!
//! A run with the same dataset and configuration reproduces identical
//! parameters and the same fingerprint. Accuracy is reported, never gated on.

mod dataset;

pub use dataset::{Dataset, LabeledExample};

use crate::artifacts::ModelArtifacts;
use crate::classifier::{FitDiagnostics, LogisticClassifier, LogisticConfig};
use crate::features::FeatureVector;
use crate::model::{FitnessModel, ModelMetadata};
use crate::scaler::StandardScaler;
use aprender::model_selection::train_test_split;
use aprender::primitives::{Matrix, Vector};
use chrono::Utc;
use coach_core::constants::fitness_model::{
    ARTIFACT_FORMAT_VERSION, CLASSIFIER_FILE_NAME, FEATURE_NAMES, SCALER_FILE_NAME,
};
use coach_core::constants::training::{DEFAULT_SEED, DEFAULT_TEST_FRACTION, MIN_TRAINING_ROWS};
use coach_core::errors::ModelError;
use coach_core::models::ExperienceLevel;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Training job configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows held out, in `[0, 1)`
    pub test_fraction: f64,
    /// Shuffle seed
    pub seed: u64,
    /// Classifier hyper-parameters
    pub logistic: LogisticConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            logistic: LogisticConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Set the holdout fraction
    #[must_use]
    pub const fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    /// Set the shuffle seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the classifier hyper-parameters
    #[must_use]
    pub const fn with_logistic(mut self, logistic: LogisticConfig) -> Self {
        self.logistic = logistic;
        self
    }

    /// Validate every parameter
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Training` on an out-of-range parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ModelError::training(format!(
                "test fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        self.logistic.validate()
    }

    /// Number of holdout rows for a dataset of `rows` rows: `ceil(fraction * rows)`
    #[must_use]
    pub fn holdout_size(&self, rows: usize) -> usize {
        ((self.test_fraction * rows as f64).ceil() as usize).min(rows)
    }
}

/// Diagnostics from one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Rows in the dataset
    pub total_rows: usize,
    /// Rows used to fit
    pub train_rows: usize,
    /// Rows held out
    pub test_rows: usize,
    /// Expert rows in the training partition
    pub train_expert_rows: usize,
    /// Holdout accuracy of the hard prediction against the binary label
    pub holdout_accuracy: Option<f64>,
    /// Gradient descent diagnostics
    pub fit: FitDiagnostics,
    /// Training fingerprint
    pub fingerprint: String,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Model ready for inference
    pub model: FitnessModel,
    /// Persistable artifacts
    pub artifacts: ModelArtifacts,
    /// Run diagnostics
    pub report: TrainingReport,
}

impl TrainingOutcome {
    /// Write both artifacts into `dir` under their default file names
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ArtifactIo` on filesystem failures.
    pub fn save_to_dir(&self, dir: &Path) -> Result<(PathBuf, PathBuf), ModelError> {
        let scaler_path = dir.join(SCALER_FILE_NAME);
        let classifier_path = dir.join(CLASSIFIER_FILE_NAME);
        self.artifacts.save(&scaler_path, &classifier_path)?;
        Ok((scaler_path, classifier_path))
    }
}

/// Fit the scaler and classifier on `dataset`.
///
/// Nothing is written to disk; persist with [`TrainingOutcome::save_to_dir`]
/// or [`ModelArtifacts::save`] after inspecting the report.
///
/// # Errors
///
/// Returns `ModelError::Training` for invalid configuration or divergence, and
/// `ModelError::InsufficientData` when the training partition is too small or
/// contains a single class.
#[instrument(skip(dataset), fields(rows = dataset.len()))]
pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainingOutcome, ModelError> {
    config.validate()?;

    let examples = dataset.examples();
    let (train_idx, test_idx) = split_indices(examples.len(), config)?;
    if train_idx.len() < MIN_TRAINING_ROWS {
        return Err(ModelError::insufficient(format!(
            "training partition has {} rows, need at least {MIN_TRAINING_ROWS}",
            train_idx.len()
        )));
    }

    let train_features: Vec<FeatureVector> =
        train_idx.iter().map(|&i| examples[i].features).collect();
    let train_labels: Vec<bool> = train_idx.iter().map(|&i| examples[i].is_expert()).collect();

    let scaler = StandardScaler::fit(&train_features)?;
    let scaled = scaler.transform_all(&train_features);
    let (classifier, fit) = LogisticClassifier::fit(&scaled, &train_labels, &config.logistic)?;

    let fingerprint = fingerprint(dataset, config);
    let mut metadata = ModelMetadata {
        format_version: ARTIFACT_FORMAT_VERSION,
        feature_order: FEATURE_NAMES.iter().map(|n| (*n).to_owned()).collect(),
        fingerprint: fingerprint.clone(),
        trained_at: Utc::now(),
        hyperparameters: config.logistic,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        holdout_accuracy: None,
    };
    let model = FitnessModel::new(scaler.clone(), classifier.clone(), metadata.clone());

    let holdout_accuracy = evaluate(&model, examples, &test_idx);
    metadata.holdout_accuracy = holdout_accuracy;
    let model = FitnessModel::new(scaler, classifier, metadata);

    let report = TrainingReport {
        total_rows: examples.len(),
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        train_expert_rows: train_labels.iter().filter(|l| **l).count(),
        holdout_accuracy,
        fit,
        fingerprint,
    };

    info!(
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        accuracy = ?report.holdout_accuracy,
        iterations = report.fit.iterations,
        converged = report.fit.converged,
        fingerprint = %report.fingerprint,
        "fitness model trained"
    );

    Ok(TrainingOutcome {
        artifacts: ModelArtifacts::from_model(&model),
        model,
        report,
    })
}

/// Load a CSV dataset, train, and write artifacts into `output_dir`
///
/// # Errors
///
/// Propagates dataset, training, and artifact errors. Existing artifacts are
/// only replaced after a successful fit.
pub fn train_from_csv(
    dataset_path: &Path,
    output_dir: &Path,
    config: &TrainingConfig,
) -> Result<TrainingOutcome, ModelError> {
    let dataset = Dataset::from_path(dataset_path)?;
    let outcome = train(&dataset, config)?;
    outcome.save_to_dir(output_dir)?;
    Ok(outcome)
}

/// Largest dataset whose row ids survive the `f32` round trip exactly
const MAX_SPLIT_ROWS: usize = 1 << f32::MANTISSA_DIGITS;

/// Seeded shuffle of row ids into train and holdout partitions.
///
/// Row ids rather than feature values go through aprender's splitter, so the
/// `f64` features reach the scaler untouched. The holdout has
/// `ceil(fraction * rows)` rows.
fn split_indices(
    rows: usize,
    config: &TrainingConfig,
) -> Result<(Vec<usize>, Vec<usize>), ModelError> {
    let test = config.holdout_size(rows);
    if test == 0 {
        return Ok(((0..rows).collect(), Vec::new()));
    }
    if test >= rows {
        return Err(ModelError::insufficient(format!(
            "holdout of {test} rows leaves nothing to train on ({rows} rows)"
        )));
    }
    if rows > MAX_SPLIT_ROWS {
        return Err(ModelError::training(format!(
            "dataset has {rows} rows, at most {MAX_SPLIT_ROWS} are supported"
        )));
    }

    let ids: Vec<f32> = (0..rows).map(|i| i as f32).collect();
    let id_column = Matrix::from_vec(rows, 1, ids.clone()).map_err(ModelError::training)?;
    let id_targets = Vector::from_vec(ids);
    let fraction = test as f32 / rows as f32;

    let (train_ids, test_ids, _, _) =
        train_test_split(&id_column, &id_targets, fraction, Some(config.seed))
            .map_err(ModelError::training)?;
    Ok((row_ids(&train_ids), row_ids(&test_ids)))
}

fn row_ids(ids: &Matrix<f32>) -> Vec<usize> {
    ids.as_slice().iter().map(|id| *id as usize).collect()
}

/// Fraction of holdout rows whose predicted class matches the binary label
fn evaluate(model: &FitnessModel, examples: &[LabeledExample], test_idx: &[usize]) -> Option<f64> {
    if test_idx.is_empty() {
        return None;
    }
    let rows: Vec<FeatureVector> = test_idx.iter().map(|&i| examples[i].features).collect();
    let correct = model
        .predict_batch(&rows)
        .iter()
        .zip(test_idx)
        .filter(|&(result, &i)| {
            let predicted_expert = result.experience_level != ExperienceLevel::Beginner;
            predicted_expert == examples[i].is_expert()
        })
        .count();

    Some(correct as f64 / test_idx.len() as f64)
}

/// SHA-256 over every row, the seed, and the hyper-parameters
fn fingerprint(dataset: &Dataset, config: &TrainingConfig) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ARTIFACT_FORMAT_VERSION.to_le_bytes());
    for example in dataset.examples() {
        for value in example.features.as_array() {
            hasher.update(value.to_bits().to_le_bytes());
        }
        hasher.update([example.level]);
    }
    hasher.update(config.seed.to_le_bytes());
    hasher.update(config.test_fraction.to_bits().to_le_bytes());
    hasher.update(config.logistic.inverse_regularization.to_bits().to_le_bytes());
    hasher.update(config.logistic.learning_rate.to_bits().to_le_bytes());
    hasher.update((config.logistic.max_iterations as u64).to_le_bytes());
    hasher.update(config.logistic.tolerance.to_bits().to_le_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdout_size_rounds_up() {
        let config = TrainingConfig::default();
        assert_eq!(config.holdout_size(10), 2);
        assert_eq!(config.holdout_size(11), 3);
        assert_eq!(config.holdout_size(0), 0);
        assert_eq!(config.with_test_fraction(0.0).holdout_size(10), 0);
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let config = TrainingConfig::default();
        let (train_a, test_a) = split_indices(50, &config).unwrap();
        let (train_b, test_b) = split_indices(50, &config).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 10);
        assert_eq!(train_a.len(), 40);
        assert!(test_a.iter().all(|i| !train_a.contains(i)));

        let mut all: Vec<usize> = train_a.iter().chain(&test_a).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());

        let (_, test_c) = split_indices(50, &config.with_seed(7)).unwrap();
        assert_ne!(test_a, test_c);
    }

    #[test]
    fn test_split_holdout_rounds_up_through_splitter() {
        let config = TrainingConfig::default();
        for rows in [7, 11, 101, 999] {
            let (train, test) = split_indices(rows, &config).unwrap();
            assert_eq!(test.len(), config.holdout_size(rows), "rows = {rows}");
            assert_eq!(train.len() + test.len(), rows);
        }
    }

    #[test]
    fn test_split_without_holdout_or_training_rows() {
        let config = TrainingConfig::default();
        let (train, test) = split_indices(5, &config.with_test_fraction(0.0)).unwrap();
        assert_eq!(train, vec![0, 1, 2, 3, 4]);
        assert!(test.is_empty());

        let err = split_indices(1, &config).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientData { .. }));
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let config = TrainingConfig::default().with_test_fraction(1.0);
        assert!(config.validate().is_err());
        let config = TrainingConfig::default().with_test_fraction(-0.1);
        assert!(config.validate().is_err());
    }
}
