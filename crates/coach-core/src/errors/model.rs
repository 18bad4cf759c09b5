// ABOUTME: Error types for fitness model artifacts and the offline training pipeline
// ABOUTME: Separates startup-fatal artifact failures from training-run failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Model Error Types
//!
//! - Artifact variants are startup-fatal: the server must not serve inference with them.
//! - Dataset and training variants are fatal to a single training run only.
//! - Conversion to `AppError` for logging and HTTP formatting.

use super::{AppError, ErrorCode};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating, or producing fitness model artifacts
#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact file does not exist
    #[error("model artifact not found: {}", .path.display())]
    ArtifactMissing {
        /// Expected artifact location
        path: PathBuf,
    },

    /// Artifact could not be read or written
    #[error("model artifact I/O failed for {}: {source}", .path.display())]
    ArtifactIo {
        /// Artifact location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Artifact exists but does not deserialize into the expected shape
    #[error("model artifact {} is corrupt: {reason}", .path.display())]
    ArtifactCorrupt {
        /// Artifact location
        path: PathBuf,
        /// What failed to parse or validate
        reason: String,
    },

    /// Artifacts parse but cannot be used together with this build
    #[error("incompatible model artifacts: {reason}")]
    Incompatible {
        /// Which compatibility check failed
        reason: String,
    },

    /// Training dataset could not be opened
    #[error("training dataset I/O failed for {}: {source}", .path.display())]
    DatasetIo {
        /// Dataset location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Training dataset is malformed
    #[error("malformed training dataset{}: {reason}", .row.map(|r| format!(" at row {r}")).unwrap_or_default())]
    Dataset {
        /// 1-based data row, when the failure is row-specific
        row: Option<usize>,
        /// What is wrong with the data
        reason: String,
    },

    /// Not enough usable data to fit the model
    #[error("insufficient training data: {reason}")]
    InsufficientData {
        /// Why the data cannot be fitted
        reason: String,
    },

    /// Fitting diverged or produced non-finite parameters
    #[error("model training failed: {reason}")]
    Training {
        /// Failure description
        reason: String,
    },
}

impl ModelError {
    /// Create a corrupt-artifact error
    #[must_use]
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an incompatibility error
    #[must_use]
    pub fn incompatible(reason: impl Into<String>) -> Self {
        Self::Incompatible {
            reason: reason.into(),
        }
    }

    /// Create a row-level dataset error
    #[must_use]
    pub fn dataset_row(row: usize, reason: impl Into<String>) -> Self {
        Self::Dataset {
            row: Some(row),
            reason: reason.into(),
        }
    }

    /// Create a dataset-wide error
    #[must_use]
    pub fn dataset(reason: impl Into<String>) -> Self {
        Self::Dataset {
            row: None,
            reason: reason.into(),
        }
    }

    /// Create an insufficient-data error
    #[must_use]
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Create a training failure
    #[must_use]
    pub fn training(reason: impl Into<String>) -> Self {
        Self::Training {
            reason: reason.into(),
        }
    }

    /// Whether this error concerns the persisted artifacts (startup-fatal)
    #[must_use]
    pub const fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            Self::ArtifactMissing { .. }
                | Self::ArtifactIo { .. }
                | Self::ArtifactCorrupt { .. }
                | Self::Incompatible { .. }
        )
    }

    const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ArtifactMissing { .. } => ErrorCode::ConfigMissing,
            Self::ArtifactCorrupt { .. } | Self::Incompatible { .. } => ErrorCode::ConfigInvalid,
            Self::ArtifactIo { .. } | Self::DatasetIo { .. } => ErrorCode::StorageError,
            Self::Dataset { .. } | Self::InsufficientData { .. } => ErrorCode::InvalidInput,
            Self::Training { .. } => ErrorCode::InternalError,
        }
    }
}

impl From<ModelError> for AppError {
    fn from(error: ModelError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        Self::new(code, message).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_row_message() {
        let error = ModelError::dataset_row(17, "Experience_Level must be 1, 2 or 3, got 5");
        assert_eq!(
            error.to_string(),
            "malformed training dataset at row 17: Experience_Level must be 1, 2 or 3, got 5"
        );
        assert!(!error.is_artifact_error());
    }

    #[test]
    fn test_artifact_errors_map_to_config_codes() {
        let missing = ModelError::ArtifactMissing {
            path: PathBuf::from("models/scaler.json"),
        };
        assert!(missing.is_artifact_error());

        let app: AppError = missing.into();
        assert_eq!(app.code, ErrorCode::ConfigMissing);
        assert!(app.message.contains("models/scaler.json"));

        let app: AppError = ModelError::incompatible("feature order differs").into();
        assert_eq!(app.code, ErrorCode::ConfigInvalid);
    }
}
