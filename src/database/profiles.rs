// ABOUTME: Profile table operations for onboarded athletes
// ABOUTME: Upserts profiles and reads/writes the biometrics and fitness-model outputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{decode_json, record, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{BiometricInput, ExperienceLevel, UserProfile};
use chrono::Utc;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::time::Instant;

impl Database {
    /// Create the `user_profiles` table
    pub(super) async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                broad_goal TEXT NOT NULL,
                goals TEXT NOT NULL DEFAULT '[]',
                workouts_per_week INTEGER NOT NULL DEFAULT 0,
                weight_kg REAL NOT NULL DEFAULT 0,
                height_cm REAL NOT NULL DEFAULT 0,
                age REAL NOT NULL DEFAULT 0,
                resting_bpm REAL NOT NULL DEFAULT 0,
                experience_level INTEGER NOT NULL DEFAULT 1 CHECK (experience_level IN (1, 2, 3)),
                fitness_score REAL NOT NULL DEFAULT 0,
                target_calories INTEGER NOT NULL,
                ai_extracted_data TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a profile, or replace everything but `created_at` if it exists
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let started = Instant::now();
        let goals = serde_json::to_string(&profile.goals)?;
        let extracted = if profile.ai_extracted_data.is_null() {
            None
        } else {
            Some(profile.ai_extracted_data.to_string())
        };

        let result = sqlx::query(
            r"
            INSERT INTO user_profiles (
                user_id, broad_goal, goals, workouts_per_week, weight_kg, height_cm, age,
                resting_bpm, experience_level, fitness_score, target_calories,
                ai_extracted_data, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT(user_id) DO UPDATE SET
                broad_goal = excluded.broad_goal,
                goals = excluded.goals,
                workouts_per_week = excluded.workouts_per_week,
                weight_kg = excluded.weight_kg,
                height_cm = excluded.height_cm,
                age = excluded.age,
                resting_bpm = excluded.resting_bpm,
                experience_level = excluded.experience_level,
                fitness_score = excluded.fitness_score,
                target_calories = excluded.target_calories,
                ai_extracted_data = excluded.ai_extracted_data,
                updated_at = excluded.updated_at
            ",
        )
        .bind(&profile.user_id)
        .bind(&profile.broad_goal)
        .bind(goals)
        .bind(i64::from(profile.workouts_per_week))
        .bind(profile.weight_kg)
        .bind(profile.height_cm)
        .bind(profile.age)
        .bind(profile.resting_bpm)
        .bind(i64::from(profile.experience_level.as_u8()))
        .bind(profile.fitness_score)
        .bind(profile.target_calories)
        .bind(extracted)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(AppError::from);

        record("upsert", "user_profiles", started, result)
    }

    /// Get a profile by user id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed.
    pub async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT user_id, broad_goal, goals, workouts_per_week, weight_kg, height_cm, age,
                   resting_bpm, experience_level, fitness_score, target_calories,
                   ai_extracted_data, created_at, updated_at
            FROM user_profiles WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_profile).transpose()
    }

    /// Biometric columns read by the fitness-score pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_biometrics(&self, user_id: &str) -> AppResult<Option<BiometricInput>> {
        let row = sqlx::query(
            r"
            SELECT age, weight_kg, height_cm, resting_bpm, workouts_per_week
            FROM user_profiles WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let workouts: i64 = row.try_get("workouts_per_week")?;
        Ok(Some(BiometricInput::new(
            row.try_get("age")?,
            row.try_get("weight_kg")?,
            row.try_get("height_cm")?,
            row.try_get("resting_bpm")?,
            u32::try_from(workouts).unwrap_or(0),
        )))
    }

    /// Write back the model outputs; returns `false` when no profile matched
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn update_fitness_result(
        &self,
        user_id: &str,
        fitness_score: f64,
        experience_level: ExperienceLevel,
    ) -> AppResult<bool> {
        let started = Instant::now();
        let result = sqlx::query(
            r"
            UPDATE user_profiles
            SET fitness_score = $2, experience_level = $3, updated_at = $4
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .bind(fitness_score)
        .bind(i64::from(experience_level.as_u8()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected() > 0)
        .map_err(AppError::from);

        record("update_fitness", "user_profiles", started, result)
    }

    /// Stored goals, or `None` when the user has no profile
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the goals column is malformed.
    pub async fn get_goals(&self, user_id: &str) -> AppResult<Option<Vec<String>>> {
        let goals: Option<Option<String>> =
            sqlx::query_scalar("SELECT goals FROM user_profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        goals.map(|raw| decode_json(raw, Vec::new())).transpose()
    }
}

fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
    let workouts: i64 = row.try_get("workouts_per_week")?;
    let level: i64 = row.try_get("experience_level")?;
    let level = u8::try_from(level)
        .map_err(|_| AppError::database(format!("stored experience level {level} is invalid")))
        .and_then(ExperienceLevel::try_from)?;

    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        broad_goal: row.try_get("broad_goal")?,
        goals: decode_json(row.try_get("goals")?, Vec::new())?,
        workouts_per_week: u32::try_from(workouts).unwrap_or(0),
        weight_kg: row.try_get("weight_kg")?,
        height_cm: row.try_get("height_cm")?,
        age: row.try_get("age")?,
        resting_bpm: row.try_get("resting_bpm")?,
        experience_level: level,
        fitness_score: row.try_get("fitness_score")?,
        target_calories: row.try_get("target_calories")?,
        ai_extracted_data: decode_json(row.try_get("ai_extracted_data")?, Value::Null)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
