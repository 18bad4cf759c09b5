// ABOUTME: Fitness scoring service wrapping the shared read-only fitness model
// ABOUTME: Scores ad-hoc biometrics and rescores stored profiles, writing results back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::{FitnessModel, InferenceResult};
use crate::logging::AppLogger;
use crate::models::{BiometricInput, RawBiometricPayload};
use std::sync::Arc;
use tracing::instrument;

/// Fitness-score inference over the shared model
#[derive(Clone)]
pub struct FitnessScoringService {
    model: Arc<FitnessModel>,
    database: Database,
}

impl FitnessScoringService {
    /// Create the service
    #[must_use]
    pub const fn new(model: Arc<FitnessModel>, database: Database) -> Self {
        Self { model, database }
    }

    /// Score loosely typed biometrics; missing fields default to zero
    #[must_use]
    pub fn score(&self, payload: RawBiometricPayload) -> InferenceResult {
        self.score_input(&payload.into_input(), None)
    }

    /// Score validated biometrics, attributing the event to `user_id` when known
    #[must_use]
    pub fn score_input(&self, input: &BiometricInput, user_id: Option<&str>) -> InferenceResult {
        let result = self.model.infer(input);
        AppLogger::log_inference(
            user_id,
            result.fitness_score,
            result.experience_level.as_u8(),
        );
        result
    }

    /// Re-run inference on a stored profile and persist the outputs
    ///
    /// # Errors
    ///
    /// Returns not-found when the profile does not exist, or a database error.
    #[instrument(skip(self))]
    pub async fn rescore(&self, user_id: &str) -> AppResult<InferenceResult> {
        let biometrics = self
            .database
            .get_biometrics(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))?;

        let result = self.score_input(&biometrics, Some(user_id));
        let updated = self
            .database
            .update_fitness_result(user_id, result.fitness_score, result.experience_level)
            .await?;
        if !updated {
            return Err(AppError::not_found(format!("Profile {user_id}")));
        }

        Ok(result)
    }
}
