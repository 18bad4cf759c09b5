// ABOUTME: Workout log table operations
// ABOUTME: Records completed sessions and counts them over a time window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{record, Database};
use crate::errors::{AppError, AppResult};
use crate::models::WorkoutLog;
use chrono::{DateTime, Utc};
use std::time::Instant;

impl Database {
    /// Create the `workout_logs` table
    pub(super) async fn migrate_workouts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_logs (
                workout_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                activity TEXT NOT NULL,
                duration_minutes INTEGER,
                completed_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_logs_user_completed ON workout_logs(user_id, completed_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record a completed workout
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn log_workout(&self, workout: &WorkoutLog) -> AppResult<()> {
        let started = Instant::now();
        let result = sqlx::query(
            r"
            INSERT INTO workout_logs (workout_id, user_id, activity, duration_minutes, completed_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&workout.workout_id)
        .bind(&workout.user_id)
        .bind(&workout.activity)
        .bind(workout.duration_minutes.map(i64::from))
        .bind(workout.completed_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(AppError::from);

        record("insert", "workout_logs", started, result)
    }

    /// Workouts completed at or after `since`
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_workouts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workout_logs WHERE user_id = $1 AND completed_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
