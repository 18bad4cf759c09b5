// ABOUTME: Onboarding route handlers for the conversational profile clerk
// ABOUTME: Advances the chat one turn and completes profiles once body metrics arrive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::{ConversationTurn, PartialProfile};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Query parameters for `POST /onboard`
#[derive(Debug, Default, Deserialize)]
struct OnboardQuery {
    #[serde(default)]
    broad_goal: Option<String>,
}

/// Onboarding routes
pub struct OnboardingRoutes;

impl OnboardingRoutes {
    /// Create all onboarding routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/onboard", post(Self::handle_onboard))
            .route("/complete_profile", post(Self::handle_complete_profile))
            .with_state(resources)
    }

    /// Handle one clerk turn
    async fn handle_onboard(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<OnboardQuery>,
        Json(history): Json<Vec<ConversationTurn>>,
    ) -> Result<Response, AppError> {
        let outcome = resources
            .onboarding()?
            .process(&history, params.broad_goal)
            .await?;

        Ok((StatusCode::OK, Json(outcome)).into_response())
    }

    /// Handle the metrics form submission
    async fn handle_complete_profile(
        State(resources): State<Arc<ServerResources>>,
        Json(partial): Json<PartialProfile>,
    ) -> Result<Response, AppError> {
        let outcome = resources.onboarding()?.complete_profile(partial).await?;

        Ok((StatusCode::OK, Json(outcome)).into_response())
    }
}
