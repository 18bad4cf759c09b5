// ABOUTME: Journal route handlers for entry submission and mood history
// ABOUTME: Submission needs the LLM; history reads storage only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::JournalService;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Query parameters for `POST /journal`
#[derive(Debug, Deserialize)]
struct JournalQuery {
    user_id: String,
    entry_text: String,
}

/// Journal routes
pub struct JournalRoutes;

impl JournalRoutes {
    /// Create all journal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/journal", post(Self::handle_submit))
            .route("/journal_history/:user_id", get(Self::handle_history))
            .with_state(resources)
    }

    async fn handle_submit(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<JournalQuery>,
    ) -> Result<Response, AppError> {
        let analysis = resources
            .journal()?
            .submit(&params.user_id, &params.entry_text)
            .await?;

        Ok((StatusCode::OK, Json(analysis)).into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        Path(user_id): Path<String>,
    ) -> Result<Response, AppError> {
        let history = JournalService::history(&resources.database, &user_id).await?;

        Ok((StatusCode::OK, Json(json!({ "history": history }))).into_response())
    }
}
