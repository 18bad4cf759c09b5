// ABOUTME: Profile route handlers for stored athletes
// ABOUTME: Reads profiles, rescores them, and generates or fetches weekly schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::ScheduleService;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Profile routes
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/profiles/:user_id", get(Self::handle_get_profile))
            .route(
                "/profiles/:user_id/fitness-score",
                post(Self::handle_rescore),
            )
            .route(
                "/profiles/:user_id/schedule",
                post(Self::handle_generate_schedule).get(Self::handle_latest_schedule),
            )
            .with_state(resources)
    }

    async fn handle_get_profile(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let profile = resources
            .database
            .get_profile(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))?;

        Ok((StatusCode::OK, Json(profile)).into_response())
    }

    /// Re-run inference on the stored biometrics
    async fn handle_rescore(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let result = resources.fitness_scoring().rescore(&user_id).await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }

    async fn handle_generate_schedule(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let stored = resources.schedule()?.generate(&user_id).await?;

        Ok((StatusCode::CREATED, Json(stored)).into_response())
    }

    async fn handle_latest_schedule(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let stored = ScheduleService::latest(&resources.database, &user_id).await?;

        Ok((StatusCode::OK, Json(stored)).into_response())
    }
}
