// ABOUTME: Weekly schedule table operations
// ABOUTME: Appends generated plans and reads back the latest one per user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{record, Database};
use crate::errors::{AppError, AppResult};
use crate::models::StoredSchedule;
use sqlx::Row;
use std::time::Instant;

impl Database {
    /// Create the `weekly_schedules` table
    pub(super) async fn migrate_schedules(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS weekly_schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                schedule TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_weekly_schedules_user ON weekly_schedules(user_id, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a generated schedule; earlier plans are kept as history
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save_schedule(&self, stored: &StoredSchedule) -> AppResult<()> {
        let started = Instant::now();
        let schedule = serde_json::to_string(&stored.schedule)?;

        let result = sqlx::query(
            "INSERT INTO weekly_schedules (user_id, schedule, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&stored.user_id)
        .bind(schedule)
        .bind(stored.created_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(AppError::from);

        record("insert", "weekly_schedules", started, result)
    }

    /// Most recently generated schedule for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored plan is malformed.
    pub async fn latest_schedule(&self, user_id: &str) -> AppResult<Option<StoredSchedule>> {
        let row = sqlx::query(
            r"
            SELECT user_id, schedule, created_at
            FROM weekly_schedules
            WHERE user_id = $1
            ORDER BY id DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let schedule: String = row.try_get("schedule")?;
        Ok(Some(StoredSchedule {
            user_id: row.try_get("user_id")?,
            schedule: serde_json::from_str(&schedule)?,
            created_at: row.try_get("created_at")?,
        }))
    }
}
