// ABOUTME: SQLite persistence for profiles, journals, schedules, and workout logs
// ABOUTME: Owns the connection pool, schema migrations, and the health ping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! One `SQLite` pool shared by every service. Each table family lives in its
//! own submodule that extends [`Database`] with its migration and queries.
//!
//! Timestamps are stored as RFC 3339 text, so lexicographic order is
//! chronological order.

mod journals;
mod profiles;
mod schedules;
mod workouts;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Instant;
use tokio::fs;
use tracing::{debug, info};

/// Pool size for file-backed databases
const MAX_CONNECTIONS: u32 = 5;

/// Database manager for coaching data
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if needed) the database and run migrations
    ///
    /// In-memory databases use a single long-lived connection: every
    /// `SQLite` memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the
    /// connection fails, or a migration fails.
    pub async fn new(url: &DatabaseUrl) -> AppResult<Self> {
        if let DatabaseUrl::SQLite { path } = url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::storage(format!(
                        "cannot create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        // Ensure SQLite creates the database file if it doesn't exist
        let options = SqliteConnectOptions::from_str(&url.to_connection_string())?
            .create_if_missing(true);

        let pool_options = if url.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
        };
        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database = %url, "Database ready");

        Ok(db)
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any table or index creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_profiles().await?;
        self.migrate_journals().await?;
        self.migrate_schedules().await?;
        self.migrate_workouts().await?;
        debug!("Database migrations applied");
        Ok(())
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns a database error when the pool cannot serve a connection.
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Log a timed write and pass its result through
fn record<T>(operation: &str, table: &str, started: Instant, result: AppResult<T>) -> AppResult<T> {
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    AppLogger::log_database_operation(operation, table, result.is_ok(), elapsed);
    result
}

/// Decode a JSON text column, treating NULL or empty text as `default`
fn decode_json<T: DeserializeOwned>(raw: Option<String>, default: T) -> AppResult<T> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}
