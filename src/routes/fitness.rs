// ABOUTME: Fitness-score route handlers over the shared inference model
// ABOUTME: Scores ad-hoc biometrics and exposes the loaded model's provenance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fitness-score routes
//!
//! `POST /fitness/score` accepts the loosely typed payload the web client
//! sends: absent or null fields default to zero and never fail the request.

use crate::models::RawBiometricPayload;
use crate::resources::ServerResources;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Fitness-score routes
pub struct FitnessRoutes;

impl FitnessRoutes {
    /// Create all fitness-score routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/fitness/score", post(Self::handle_score))
            .route("/fitness/model", get(Self::handle_model))
            .with_state(resources)
    }

    async fn handle_score(
        State(resources): State<Arc<ServerResources>>,
        Json(payload): Json<RawBiometricPayload>,
    ) -> Response {
        let result = resources.fitness_scoring().score(payload);

        (StatusCode::OK, Json(result)).into_response()
    }

    async fn handle_model(State(resources): State<Arc<ServerResources>>) -> Response {
        (StatusCode::OK, Json(resources.model.metadata())).into_response()
    }
}
