// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, database URL, model artifact paths, LLM, sentiment, and CORS settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use crate::constants::{defaults, env_vars};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debugging detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database file
    SQLite {
        /// File path
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse a `sqlite:` URL; bare paths are treated as `SQLite` files
    ///
    /// # Errors
    ///
    /// Returns a config error for non-`SQLite` schemes or an empty path.
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let trimmed = s.trim();
        if trimmed.contains("://") && !trimmed.starts_with("sqlite:") {
            return Err(AppError::config(format!(
                "unsupported database URL '{trimmed}', only sqlite is available"
            )));
        }

        let path = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);

        match path {
            "" => Err(AppError::config("database URL has an empty path")),
            ":memory:" => Ok(Self::Memory),
            file => Ok(Self::SQLite {
                path: PathBuf::from(file),
            }),
        }
    }

    /// Convert to a `sqlx` connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL).unwrap_or(Self::Memory)
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_connection_string())
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
}

/// Fitness model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Scaler artifact
    pub scaler_path: PathBuf,
    /// Classifier artifact
    pub classifier_path: PathBuf,
}

/// Generative model settings
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key; the LLM-backed endpoints are unavailable without one
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Temperature for the onboarding clerk
    pub onboarding_temperature: f32,
    /// Temperature for journal analysis and schedule planning
    pub journal_temperature: f32,
    /// Outbound request timeout
    pub timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("onboarding_temperature", &self.onboarding_temperature)
            .field("journal_temperature", &self.journal_temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Which sentiment scorer the journal service uses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBackend {
    /// Deterministic word-list scorer
    #[default]
    Lexicon,
    /// Ask the configured LLM for a score
    Llm,
}

impl SentimentBackend {
    /// Parse `SENTIMENT_BACKEND`
    ///
    /// # Errors
    ///
    /// Returns a config error for unknown backends.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexicon" => Ok(Self::Lexicon),
            "llm" => Ok(Self::Llm),
            other => Err(AppError::config(format!(
                "unknown sentiment backend '{other}', expected 'lexicon' or 'llm'"
            ))),
        }
    }
}

/// Browser origins allowed to call the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Fitness model artifacts
    pub model: ModelConfig,
    /// Generative model
    pub llm: LlmConfig,
    /// Sentiment scorer
    pub sentiment: SentimentBackend,
    /// CORS
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error when a variable is present but malformed, or
    /// when validation fails.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let http_port = env_var_or(env_vars::HTTP_PORT, &defaults::HTTP_PORT.to_string())
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {}: {e}", env_vars::HTTP_PORT)))?;

        let config = Self {
            http_port,
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or(env_vars::RUST_LOG, "info")),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    env_vars::DATABASE_URL,
                    defaults::DATABASE_URL,
                ))?,
            },
            model: ModelConfig {
                scaler_path: PathBuf::from(env_var_or(
                    env_vars::FITNESS_SCALER_PATH,
                    defaults::SCALER_PATH,
                )),
                classifier_path: PathBuf::from(env_var_or(
                    env_vars::FITNESS_MODEL_PATH,
                    defaults::CLASSIFIER_PATH,
                )),
            },
            llm: LlmConfig {
                api_key: env::var(env_vars::GEMINI_API_KEY)
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                model: env_var_or(env_vars::LLM_MODEL, defaults::LLM_MODEL),
                onboarding_temperature: defaults::ONBOARDING_TEMPERATURE,
                journal_temperature: defaults::JOURNAL_TEMPERATURE,
                timeout_secs: defaults::LLM_TIMEOUT_SECS,
            },
            sentiment: SentimentBackend::parse(&env_var_or(
                env_vars::SENTIMENT_BACKEND,
                "lexicon",
            ))?,
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or(
                    env_vars::CORS_ALLOWED_ORIGINS,
                    defaults::CORS_ORIGINS,
                )),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a config error for a zero port, an empty model name, or an LLM
    /// sentiment backend without an API key.
    pub fn validate(&self) -> AppResult<()> {
        if self.http_port == 0 {
            return Err(AppError::config("HTTP_PORT must be non-zero"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(AppError::config("LLM_MODEL must not be empty"));
        }
        if self.sentiment == SentimentBackend::Llm && self.llm.api_key.is_none() {
            return Err(AppError::config(
                "SENTIMENT_BACKEND=llm requires GEMINI_API_KEY",
            ));
        }
        if self.llm.api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; onboarding, journal, and schedule endpoints will be unavailable");
        }
        if self.cors.allowed_origins.is_empty() {
            warn!("CORS_ALLOWED_ORIGINS is empty; browsers will be refused");
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Coach Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Scaler Artifact: {}\n\
             - Classifier Artifact: {}\n\
             - LLM: {} ({})\n\
             - Sentiment: {:?}\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            self.log_level,
            if self.database.url.is_memory() {
                "SQLite (memory)"
            } else {
                "SQLite"
            },
            self.model.scaler_path.display(),
            self.model.classifier_path.display(),
            self.llm.model,
            if self.llm.api_key.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.sentiment,
            self.cors.allowed_origins.join(", "),
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        return vec!["*".to_owned()];
    }
    origins_str
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5173, http://127.0.0.1:5173/ ,"),
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
        assert_eq!(parse_origins(" * "), vec!["*"]);
    }

    #[test]
    fn test_database_url_parsing() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/coach.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/coach.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("coach.db").unwrap().to_connection_string(),
            "sqlite:coach.db"
        );
        assert!(DatabaseUrl::parse_url("postgres://localhost/coach").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_sentiment_backend_parsing() {
        assert_eq!(SentimentBackend::parse("LLM").unwrap(), SentimentBackend::Llm);
        assert_eq!(
            SentimentBackend::parse(" lexicon ").unwrap(),
            SentimentBackend::Lexicon
        );
        assert!(SentimentBackend::parse("vader").is_err());
    }

    #[test]
    fn test_llm_config_debug_redacts_key() {
        let config = LlmConfig {
            api_key: Some("secret-key".into()),
            model: defaults::LLM_MODEL.into(),
            onboarding_temperature: 0.1,
            journal_temperature: 0.7,
            timeout_secs: 5,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
