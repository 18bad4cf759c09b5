// ABOUTME: Coaching services orchestrating the model, the LLM, sentiment, and storage
// ABOUTME: Onboarding, journaling, fitness scoring, schedule planning, and workout tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Services
//!
//! Route handlers stay thin: each one builds the matching service from the
//! shared server resources and delegates. Services own the request flow and
//! the logging of every outbound LLM call.

mod fitness_scoring;
mod journal;
mod onboarding;
mod schedule;
mod workouts;

pub use fitness_scoring::FitnessScoringService;
pub use journal::{JournalHistoryEntry, JournalService};
pub use onboarding::{ConversationTurn, OnboardingOutcome, OnboardingService, PartialProfile};
pub use schedule::ScheduleService;
pub use workouts::WorkoutService;

use crate::errors::AppResult;
use crate::llm::{ChatRequest, ChatResponse, LlmProvider};
use crate::logging::AppLogger;
use std::time::Instant;

/// Run one completion, adapted to the provider, and log its outcome under `purpose`
async fn complete_logged(
    llm: &dyn LlmProvider,
    purpose: &str,
    request: &ChatRequest,
) -> AppResult<ChatResponse> {
    let request = request.clone().adapted_to(llm.capabilities());
    let started = Instant::now();
    let result = llm.complete(&request).await;
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    AppLogger::log_llm_call(llm.name(), purpose, result.is_ok(), elapsed);
    result
}
