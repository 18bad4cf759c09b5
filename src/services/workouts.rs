// ABOUTME: Workout logging and weekly progress against the onboarding target
// ABOUTME: Counts sessions completed since Monday of the current ISO week
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{week_start, WorkoutLog, WorkoutStats};
use chrono::{DateTime, Utc};
use tracing::instrument;

/// Completed-workout tracking
#[derive(Clone)]
pub struct WorkoutService {
    database: Database,
}

impl WorkoutService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Record a completed workout for an onboarded user
    ///
    /// # Errors
    ///
    /// Returns invalid-input for a blank activity, not-found without a
    /// profile, and database errors from storage.
    #[instrument(skip(self))]
    pub async fn log(
        &self,
        user_id: &str,
        activity: &str,
        duration_minutes: Option<u32>,
        completed_at: Option<DateTime<Utc>>,
    ) -> AppResult<WorkoutLog> {
        let activity = activity.trim();
        if activity.is_empty() {
            return Err(AppError::invalid_input("activity must not be empty"));
        }
        self.require_profile(user_id).await?;

        let workout = WorkoutLog::new(
            user_id,
            activity,
            duration_minutes,
            completed_at.unwrap_or_else(Utc::now),
        );
        self.database.log_workout(&workout).await?;
        Ok(workout)
    }

    /// Progress for the week containing now
    ///
    /// # Errors
    ///
    /// Returns not-found without a profile.
    pub async fn weekly_stats(&self, user_id: &str) -> AppResult<WorkoutStats> {
        self.weekly_stats_at(user_id, Utc::now()).await
    }

    /// Progress for the week containing `now`
    ///
    /// # Errors
    ///
    /// Returns not-found without a profile.
    pub async fn weekly_stats_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<WorkoutStats> {
        let goal = self.require_profile(user_id).await?;
        let completed = self
            .database
            .count_workouts_since(user_id, week_start(now))
            .await?;
        Ok(WorkoutStats::new(completed, goal))
    }

    /// Weekly target of an existing profile
    async fn require_profile(&self, user_id: &str) -> AppResult<u32> {
        self.database
            .get_profile(user_id)
            .await?
            .map(|profile| profile.workouts_per_week)
            .ok_or_else(|| AppError::not_found(format!("Profile {user_id}")))
    }
}
