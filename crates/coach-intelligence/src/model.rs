// ABOUTME: Read-only fitness model combining the fitted scaler and logistic classifier
// ABOUTME: Single and batch inference producing a rounded fitness score and experience tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::artifacts::ModelArtifacts;
use crate::classifier::{LogisticClassifier, LogisticConfig};
use crate::features::{FeatureEngineer, FeatureVector};
use crate::scaler::StandardScaler;
use chrono::{DateTime, Utc};
use coach_core::constants::fitness_model::SCORE_DECIMALS;
use coach_core::errors::ModelError;
use coach_core::models::{BiometricInput, ExperienceLevel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Output of one inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Probability of the expert class, rounded to two decimals
    pub fitness_score: f64,
    /// Predicted class + 1 (always 1 or 2)
    pub experience_level: ExperienceLevel,
}

/// Provenance recorded alongside the fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Artifact layout version
    pub format_version: u32,
    /// Feature order the model was trained with
    pub feature_order: Vec<String>,
    /// SHA-256 over dataset rows, seed, and hyper-parameters
    pub fingerprint: String,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// Hyper-parameters used for the fit
    pub hyperparameters: LogisticConfig,
    /// Rows used to fit
    pub train_rows: usize,
    /// Rows held out for evaluation
    pub test_rows: usize,
    /// Holdout accuracy, when a holdout existed
    pub holdout_accuracy: Option<f64>,
}

/// Immutable two-stage model shared across request handlers
#[derive(Debug, Clone)]
pub struct FitnessModel {
    scaler: StandardScaler,
    classifier: LogisticClassifier,
    metadata: ModelMetadata,
}

impl FitnessModel {
    /// Assemble a model from fitted parts
    #[must_use]
    pub const fn new(
        scaler: StandardScaler,
        classifier: LogisticClassifier,
        metadata: ModelMetadata,
    ) -> Self {
        Self {
            scaler,
            classifier,
            metadata,
        }
    }

    /// Load and validate both artifacts.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if either file is missing, unreadable, corrupt,
    /// or incompatible with the other or with this build's feature order.
    pub fn load(scaler_path: &Path, classifier_path: &Path) -> Result<Self, ModelError> {
        let model = ModelArtifacts::load(scaler_path, classifier_path)?.into_model()?;
        info!(
            fingerprint = %model.metadata.fingerprint,
            trained_at = %model.metadata.trained_at,
            holdout_accuracy = ?model.metadata.holdout_accuracy,
            "fitness model loaded"
        );
        Ok(model)
    }

    /// Score one athlete
    #[must_use]
    pub fn infer(&self, input: &BiometricInput) -> InferenceResult {
        self.predict(&FeatureEngineer::engineer(input))
    }

    /// Score many athletes in parallel; results follow input order
    #[must_use]
    pub fn infer_batch(&self, inputs: &[BiometricInput]) -> Vec<InferenceResult> {
        inputs.par_iter().map(|input| self.infer(input)).collect()
    }

    /// Score an already engineered feature vector
    #[must_use]
    pub fn predict(&self, features: &FeatureVector) -> InferenceResult {
        let standardized = self.scaler.transform(features);
        let probability = self.classifier.predict_proba(&standardized);
        let positive = self.classifier.predict(&standardized);

        InferenceResult {
            fitness_score: round_score(probability),
            experience_level: ExperienceLevel::from_binary_class(positive),
        }
    }

    /// Score many feature vectors in parallel; results follow input order
    #[must_use]
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Vec<InferenceResult> {
        rows.par_iter().map(|row| self.predict(row)).collect()
    }

    /// Training provenance
    #[must_use]
    pub const fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Fitted standardizer
    #[must_use]
    pub const fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Fitted classifier
    #[must_use]
    pub const fn classifier(&self) -> &LogisticClassifier {
        &self.classifier
    }
}

/// Round a probability to the published precision.
///
/// Only reachable with NaN when a caller hands in NaN features; that maps to 0.
fn round_score(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    let factor = 10f64.powi(SCORE_DECIMALS);
    ((probability * factor).round() / factor).clamp(0.0, 1.0)
}
