// ABOUTME: Fitness-score intelligence crate for the Pierre Coach platform
// ABOUTME: Feature engineering, two-stage inference model, artifacts, and offline training
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coach Intelligence
//!
//! The fitness-score pipeline turns raw biometrics into a probability of
//! "expert" aptitude and a discrete experience tier:
//!
//! ```text
//! BiometricInput -> FeatureEngineer -> StandardScaler -> LogisticClassifier -> InferenceResult
//! ```
//!
//! The scaler and classifier are fitted offline by [`training::train`] and
//! persisted as two JSON artifacts. The server loads them once through
//! [`FitnessModel::load`] and shares the result read-only behind an `Arc`.

/// Model artifact persistence and load-time validation
pub mod artifacts;
/// Binary L2-regularized logistic classifier
pub mod classifier;
/// Biometric feature engineering
pub mod features;
/// Inference model combining scaler and classifier
pub mod model;
/// Per-feature standardization
pub mod scaler;
/// Offline training job
pub mod training;

pub use artifacts::{ClassifierArtifact, ModelArtifacts, ScalerArtifact};
pub use classifier::{FitDiagnostics, LogisticClassifier, LogisticConfig};
pub use features::{FeatureEngineer, FeatureVector};
pub use model::{FitnessModel, InferenceResult, ModelMetadata};
pub use scaler::StandardScaler;
pub use training::{
    train, train_from_csv, Dataset, LabeledExample, TrainingConfig, TrainingOutcome,
    TrainingReport,
};
