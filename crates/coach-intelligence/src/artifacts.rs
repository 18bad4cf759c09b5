// ABOUTME: JSON persistence for the fitted scaler and classifier with load-time validation
// ABOUTME: Atomic writes and compatibility checks on format version, feature order, fingerprint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Model Artifacts
//!
//! Two files are produced per training run:
//!
//! - `scaler.json`: per-feature mean and scale
//! - `fitness_model.json`: classifier weights, intercept, and training report
//!
//! Both carry the same header (format version, feature order, fingerprint,
//! training timestamp). Loading refuses any pair whose headers disagree with
//! each other or with the feature order compiled into this crate.

use crate::classifier::{LogisticClassifier, LogisticConfig};
use crate::model::{FitnessModel, ModelMetadata};
use crate::scaler::StandardScaler;
use chrono::{DateTime, Utc};
use coach_core::constants::fitness_model::{ARTIFACT_FORMAT_VERSION, FEATURE_NAMES};
use coach_core::errors::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Header shared by both artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Layout version
    pub format_version: u32,
    /// Feature order used during training
    pub feature_order: Vec<String>,
    /// Training fingerprint
    pub fingerprint: String,
    /// Training completion time
    pub trained_at: DateTime<Utc>,
}

impl ArtifactHeader {
    /// Header for artifacts written by this build
    #[must_use]
    pub fn current(fingerprint: impl Into<String>, trained_at: DateTime<Utc>) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_order: FEATURE_NAMES.iter().map(|n| (*n).to_owned()).collect(),
            fingerprint: fingerprint.into(),
            trained_at,
        }
    }

    fn check(&self, artifact: &str) -> Result<(), ModelError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::incompatible(format!(
                "{artifact} has format version {}, this build reads version {ARTIFACT_FORMAT_VERSION}",
                self.format_version
            )));
        }
        if !self.feature_order.iter().map(String::as_str).eq(FEATURE_NAMES) {
            return Err(ModelError::incompatible(format!(
                "{artifact} feature order {:?} differs from {FEATURE_NAMES:?}",
                self.feature_order
            )));
        }
        Ok(())
    }
}

/// Persisted standardizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Shared header
    #[serde(flatten)]
    pub header: ArtifactHeader,
    /// Per-feature means
    pub mean: Vec<f64>,
    /// Per-feature scales
    pub scale: Vec<f64>,
}

/// Persisted classifier and its training report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierArtifact {
    /// Shared header
    #[serde(flatten)]
    pub header: ArtifactHeader,
    /// Weights in feature order
    pub weights: Vec<f64>,
    /// Intercept
    pub intercept: f64,
    /// Hyper-parameters used for the fit
    pub hyperparameters: LogisticConfig,
    /// Rows used to fit
    pub train_rows: usize,
    /// Rows held out
    pub test_rows: usize,
    /// Holdout accuracy
    pub holdout_accuracy: Option<f64>,
}

/// The pair of artifacts for one trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifacts {
    /// Standardizer
    pub scaler: ScalerArtifact,
    /// Classifier
    pub classifier: ClassifierArtifact,
}

impl ModelArtifacts {
    /// Snapshot a model into its persisted form
    #[must_use]
    pub fn from_model(model: &FitnessModel) -> Self {
        let meta = model.metadata();
        let header = ArtifactHeader {
            format_version: meta.format_version,
            feature_order: meta.feature_order.clone(),
            fingerprint: meta.fingerprint.clone(),
            trained_at: meta.trained_at,
        };

        Self {
            scaler: ScalerArtifact {
                header: header.clone(),
                mean: model.scaler().mean().to_vec(),
                scale: model.scaler().scale().to_vec(),
            },
            classifier: ClassifierArtifact {
                header,
                weights: model.classifier().weights().to_vec(),
                intercept: model.classifier().intercept(),
                hyperparameters: meta.hyperparameters,
                train_rows: meta.train_rows,
                test_rows: meta.test_rows,
                holdout_accuracy: meta.holdout_accuracy,
            },
        }
    }

    /// Read both artifacts without validating them against each other
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMissing`, `ArtifactIo`, or `ArtifactCorrupt`.
    pub fn load(scaler_path: &Path, classifier_path: &Path) -> Result<Self, ModelError> {
        Ok(Self {
            scaler: read_json(scaler_path)?,
            classifier: read_json(classifier_path)?,
        })
    }

    /// Validate the pair and build the inference model
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Incompatible` when versions, feature orders,
    /// fingerprints, dimensions, or values do not check out.
    pub fn into_model(self) -> Result<FitnessModel, ModelError> {
        self.scaler.header.check("scaler artifact")?;
        self.classifier.header.check("classifier artifact")?;

        if self.scaler.header.fingerprint != self.classifier.header.fingerprint {
            return Err(ModelError::incompatible(format!(
                "scaler fingerprint {} does not match classifier fingerprint {}; \
                 both artifacts must come from the same training run",
                self.scaler.header.fingerprint, self.classifier.header.fingerprint
            )));
        }

        let scaler = StandardScaler::from_parts(&self.scaler.mean, &self.scaler.scale)?;
        let classifier =
            LogisticClassifier::from_parts(&self.classifier.weights, self.classifier.intercept)?;

        let header = self.classifier.header;
        let metadata = ModelMetadata {
            format_version: header.format_version,
            feature_order: header.feature_order,
            fingerprint: header.fingerprint,
            trained_at: header.trained_at,
            hyperparameters: self.classifier.hyperparameters,
            train_rows: self.classifier.train_rows,
            test_rows: self.classifier.test_rows,
            holdout_accuracy: self.classifier.holdout_accuracy,
        };

        Ok(FitnessModel::new(scaler, classifier, metadata))
    }

    /// Write both artifacts.
    ///
    /// Each file is written next to its destination under a temporary name
    /// and renamed only after both temporaries are complete, so a failed run
    /// leaves any previous artifacts in place. The two renames are not atomic
    /// as a pair: if the second one fails, the new scaler sits next to the
    /// previous classifier and loading fails closed on the fingerprint check.
    /// Temporaries are removed on every failure path.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::ArtifactIo` on any filesystem failure.
    pub fn save(&self, scaler_path: &Path, classifier_path: &Path) -> Result<(), ModelError> {
        let scaler_tmp = stage_json(scaler_path, &self.scaler)?;
        let classifier_tmp = match stage_json(classifier_path, &self.classifier) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&scaler_tmp);
                return Err(e);
            }
        };

        if let Err(e) = commit(&scaler_tmp, scaler_path) {
            let _ = fs::remove_file(&scaler_tmp);
            let _ = fs::remove_file(&classifier_tmp);
            return Err(e);
        }
        if let Err(e) = commit(&classifier_tmp, classifier_path) {
            let _ = fs::remove_file(&classifier_tmp);
            warn!(
                classifier = %classifier_path.display(),
                "scaler replaced but classifier write failed; artifacts no longer pair"
            );
            return Err(e);
        }
        debug!(
            scaler = %scaler_path.display(),
            classifier = %classifier_path.display(),
            "model artifacts written"
        );
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ModelError::ArtifactMissing {
                path: path.to_path_buf(),
            }
        } else {
            ModelError::ArtifactIo {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&raw).map_err(|e| ModelError::corrupt(path, e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, ModelError> {
    let io_error = |source| ModelError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| ModelError::corrupt(path, format!("serialization failed: {e}")))?;

    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(io_error)?;
    Ok(tmp)
}

fn commit(tmp: &Path, path: &Path) -> Result<(), ModelError> {
    fs::rename(tmp, path).map_err(|source| ModelError::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_keeps_directory() {
        let tmp = temp_path(Path::new("models/scaler.json"));
        assert_eq!(tmp, PathBuf::from("models/scaler.json.tmp"));
    }

    #[test]
    fn test_header_rejects_reordered_features() {
        let mut header = ArtifactHeader::current("abc", Utc::now());
        header.feature_order.swap(0, 1);
        let err = header.check("scaler artifact").unwrap_err();
        assert!(matches!(err, ModelError::Incompatible { .. }));
    }

    #[test]
    fn test_header_rejects_other_versions() {
        let mut header = ArtifactHeader::current("abc", Utc::now());
        header.format_version = ARTIFACT_FORMAT_VERSION + 1;
        assert!(header.check("classifier artifact").is_err());
    }
}
