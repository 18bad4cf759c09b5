// ABOUTME: Route module organization for the Pierre Coach HTTP API
// ABOUTME: Merges every route group and applies the shared middleware stack
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for Pierre Coach
//!
//! Each domain module contains only route definitions and thin handlers
//! that delegate to the service layer.

/// Fitness-score routes
pub mod fitness;
/// Health check and readiness routes
pub mod health;
/// Journal submission and history routes
pub mod journal;
/// Conversational onboarding routes
pub mod onboarding;
/// Stored profile, rescoring, and schedule routes
pub mod profiles;
/// Workout logging and weekly progress routes
pub mod workouts;

pub use fitness::FitnessRoutes;
pub use health::HealthRoutes;
pub use journal::JournalRoutes;
pub use onboarding::OnboardingRoutes;
pub use profiles::ProfileRoutes;
pub use workouts::WorkoutRoutes;

use crate::middleware::{propagate_request_id_layer, set_request_id_layer, setup_cors};
use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the complete application router
///
/// The request id is assigned outermost so the trace span records it.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let cors = setup_cors(&resources.config);

    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(OnboardingRoutes::routes(Arc::clone(&resources)))
        .merge(JournalRoutes::routes(Arc::clone(&resources)))
        .merge(FitnessRoutes::routes(Arc::clone(&resources)))
        .merge(ProfileRoutes::routes(Arc::clone(&resources)))
        .merge(WorkoutRoutes::routes(resources))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(set_request_id_layer())
}
