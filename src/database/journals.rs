// ABOUTME: Journal table operations for normalized entries and their analysis
// ABOUTME: Stores entries, attaches sentiment and observations, and lists recent history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{decode_json, record, Database};
use crate::errors::{AppError, AppResult};
use crate::models::UserJournal;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::time::Instant;

impl Database {
    /// Create the `user_journals` table
    pub(super) async fn migrate_journals(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_journals (
                journal_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                text TEXT NOT NULL,
                cleaned_text TEXT NOT NULL,
                context_tags TEXT NOT NULL DEFAULT '[]',
                safety_flag BOOLEAN NOT NULL DEFAULT 0,
                sentiment_score REAL,
                analysis_results TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_journals_user_created ON user_journals(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Store a new journal entry
    ///
    /// # Errors
    ///
    /// Returns an error if the id already exists or the write fails.
    pub async fn insert_journal(&self, journal: &UserJournal) -> AppResult<()> {
        let started = Instant::now();
        let tags = serde_json::to_string(&journal.context_tags)?;
        let analysis = if journal.analysis_results.is_null() {
            None
        } else {
            Some(journal.analysis_results.to_string())
        };

        let result = sqlx::query(
            r"
            INSERT INTO user_journals (
                journal_id, user_id, text, cleaned_text, context_tags, safety_flag,
                sentiment_score, analysis_results, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(&journal.journal_id)
        .bind(&journal.user_id)
        .bind(&journal.text)
        .bind(&journal.cleaned_text)
        .bind(tags)
        .bind(journal.safety_flag)
        .bind(journal.sentiment_score)
        .bind(analysis)
        .bind(journal.created_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(AppError::from);

        record("insert", "user_journals", started, result)
    }

    /// Record the sentiment score and analysis on a stored entry.
    ///
    /// Returns `false` when the entry does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn attach_journal_analysis(
        &self,
        journal_id: &str,
        sentiment_score: f64,
        analysis: &Value,
    ) -> AppResult<bool> {
        let started = Instant::now();
        let result = sqlx::query(
            r"
            UPDATE user_journals
            SET sentiment_score = $2, analysis_results = $3
            WHERE journal_id = $1
            ",
        )
        .bind(journal_id)
        .bind(sentiment_score)
        .bind(analysis.to_string())
        .execute(&self.pool)
        .await
        .map(|done| done.rows_affected() > 0)
        .map_err(AppError::from);

        record("attach_analysis", "user_journals", started, result)
    }

    /// Most recent entries for a user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is malformed.
    pub async fn recent_journals(&self, user_id: &str, limit: u32) -> AppResult<Vec<UserJournal>> {
        let rows = sqlx::query(
            r"
            SELECT journal_id, user_id, text, cleaned_text, context_tags, safety_flag,
                   sentiment_score, analysis_results, created_at
            FROM user_journals
            WHERE user_id = $1
            ORDER BY created_at DESC, rowid DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_journal).collect()
    }
}

fn row_to_journal(row: &SqliteRow) -> AppResult<UserJournal> {
    Ok(UserJournal {
        journal_id: row.try_get("journal_id")?,
        user_id: row.try_get("user_id")?,
        text: row.try_get("text")?,
        cleaned_text: row.try_get("cleaned_text")?,
        context_tags: decode_json(row.try_get("context_tags")?, Vec::new())?,
        safety_flag: row.try_get("safety_flag")?,
        sentiment_score: row.try_get("sentiment_score")?,
        analysis_results: decode_json(row.try_get("analysis_results")?, Value::Null)?,
        created_at: row.try_get("created_at")?,
    })
}
