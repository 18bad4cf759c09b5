// ABOUTME: Workout route handlers for logging sessions and weekly progress
// ABOUTME: Progress counts the current ISO week against the onboarding target
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Body of `POST /workouts/{user_id}`
#[derive(Debug, Deserialize)]
struct LogWorkoutRequest {
    activity: String,
    #[serde(default)]
    duration_minutes: Option<u32>,
    /// Defaults to now
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

/// Workout routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts/:user_id", post(Self::handle_log))
            .route("/workout_stats/:user_id", get(Self::handle_stats))
            .with_state(resources)
    }

    async fn handle_log(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
        Json(request): Json<LogWorkoutRequest>,
    ) -> Result<Response, AppError> {
        let workout = resources
            .workouts()
            .log(
                &user_id,
                &request.activity,
                request.duration_minutes,
                request.completed_at,
            )
            .await?;

        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let stats = resources.workouts().weekly_stats(&user_id).await?;

        Ok((StatusCode::OK, Json(stats)).into_response())
    }
}
