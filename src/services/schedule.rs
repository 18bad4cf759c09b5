// ABOUTME: Weekly schedule planning from a stored athlete profile
// ABOUTME: Renders the planner prompt, parses the plan, and keeps the latest per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::complete_logged;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::schedule_planner_prompt;
use crate::llm::{parse_json_reply, ChatMessage, ChatRequest, LlmProvider};
use crate::models::{StoredSchedule, WeeklySchedule};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

/// Weekly schedule generation
pub struct ScheduleService {
    llm: Arc<dyn LlmProvider>,
    database: Database,
    temperature: f32,
}

impl ScheduleService {
    /// Create the service
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>, database: Database, temperature: f32) -> Self {
        Self {
            llm,
            database,
            temperature,
        }
    }

    /// Plan a training week for the user and store it
    ///
    /// # Errors
    ///
    /// Returns not-found without a profile, invalid-input when the profile
    /// has no weekly target, and an external-service error when the planner
    /// reply has no usable plan.
    #[instrument(skip(self))]
    pub async fn generate(&self, user_id: &str) -> AppResult<StoredSchedule> {
        let profile = self
            .database
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))?;
        if profile.workouts_per_week == 0 {
            return Err(AppError::invalid_input(
                "profile has no weekly workout target to plan for",
            ));
        }

        let request = ChatRequest::new(vec![ChatMessage::user(schedule_planner_prompt(&profile))])
            .with_temperature(self.temperature)
            .with_json_mode();
        let response = complete_logged(self.llm.as_ref(), "schedule", &request).await?;

        let schedule = parse_json_reply::<WeeklySchedule>(&response.content, "schedule")?
            .filter(|plan| !plan.sessions.is_empty())
            .ok_or_else(|| AppError::external_service("LLM", "planner returned no sessions"))?;

        let stored = StoredSchedule {
            user_id: profile.user_id,
            schedule,
            created_at: Utc::now(),
        };
        self.database.save_schedule(&stored).await?;
        info!(
            sessions = stored.schedule.sessions.len(),
            total_minutes = stored.schedule.total_minutes(),
            "Weekly schedule generated"
        );

        Ok(stored)
    }

    /// Most recent plan; reads storage only, so it works without an LLM
    ///
    /// # Errors
    ///
    /// Returns not-found when the user has never generated a schedule.
    pub async fn latest(database: &Database, user_id: &str) -> AppResult<StoredSchedule> {
        database
            .latest_schedule(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Schedule for {user_id}")))
    }
}
