// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, fixture fitness model, scripted LLM provider, and server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `pierre_coach`

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pierre_coach::{
    config::{
        CorsConfig, DatabaseConfig, DatabaseUrl, Environment, LlmConfig, LogLevel, ModelConfig,
        SentimentBackend, ServerConfig,
    },
    constants::fitness_model::{ARTIFACT_FORMAT_VERSION, FEATURE_NAMES},
    database::Database,
    errors::{AppError, AppResult},
    intelligence::{
        FitnessModel, LogisticClassifier, LogisticConfig, ModelMetadata, StandardScaler,
    },
    llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider},
    models::{OnboardingExtraction, UserProfile},
    resources::{ServerResources, ServerResourcesBuilder},
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with migrations applied
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new(&DatabaseUrl::Memory)
        .await
        .expect("in-memory database")
}

/// Hand-set model whose decision depends only on weekly workouts:
/// 4 or more sessions per week score above 0.5, fewer score below.
pub fn fixture_model() -> FitnessModel {
    let scaler = StandardScaler::from_parts(&[0.0; 7], &[1.0; 7]).unwrap();
    let classifier =
        LogisticClassifier::from_parts(&[0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0], -3.5).unwrap();
    let metadata = ModelMetadata {
        format_version: ARTIFACT_FORMAT_VERSION,
        feature_order: FEATURE_NAMES.iter().map(|name| (*name).to_owned()).collect(),
        fingerprint: "fixture".to_owned(),
        trained_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        hyperparameters: LogisticConfig::default(),
        train_rows: 0,
        test_rows: 0,
        holdout_accuracy: None,
    };
    FitnessModel::new(scaler, classifier, metadata)
}

/// Configuration for tests: in-memory database, lexicon sentiment, explicit origins
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 8000,
        environment: Environment::Testing,
        log_level: LogLevel::Warn,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        model: ModelConfig {
            scaler_path: PathBuf::from("models/scaler.json"),
            classifier_path: PathBuf::from("models/fitness_model.json"),
        },
        llm: LlmConfig {
            api_key: None,
            model: "mock-model".to_owned(),
            onboarding_temperature: 0.1,
            journal_temperature: 0.7,
            timeout_secs: 5,
        },
        sentiment: SentimentBackend::Lexicon,
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_owned()],
        },
    }
}

/// LLM provider that replays scripted replies and records every request
pub struct MockLlmProvider {
    capabilities: LlmCapabilities,
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmProvider {
    /// Provider with JSON mode and system messages answering with `replies` in order
    pub fn with_replies<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_capabilities(
            LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES,
            replies,
        )
    }

    /// Provider advertising only `capabilities`
    pub fn with_capabilities<I, S>(capabilities: LlmCapabilities, replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            capabilities,
            replies: Mutex::new(replies.into_iter().map(|reply| Ok(reply.into())).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Queue one more reply
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    /// Queue a failure
    pub fn push_error(&self, error: AppError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completions requested
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn display_name(&self) -> &'static str {
        "Mock LLM"
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    fn available_models(&self) -> &'static [&'static str] {
        &["mock-model"]
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::external_service("mock", "no scripted reply left")))?;

        Ok(ChatResponse {
            content: reply,
            model: "mock-model".to_owned(),
            usage: None,
            finish_reason: Some("STOP".to_owned()),
        })
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Server resources over a fresh database, with or without an LLM
pub async fn create_test_resources(llm: Option<Arc<MockLlmProvider>>) -> Arc<ServerResources> {
    let mut builder = ServerResourcesBuilder::new()
        .with_config(Arc::new(test_config()))
        .with_database(create_test_database().await)
        .with_model(Arc::new(fixture_model()));
    if let Some(llm) = llm {
        builder = builder.with_llm(llm);
    }
    builder.build_arc().unwrap()
}

/// Onboarding extraction JSON with every field filled in
pub fn complete_extraction(user_id: &str) -> Value {
    json!({
        "user_id": user_id,
        "goals": ["half marathon", "mobility"],
        "workouts_per_week": 4,
        "age": 31,
        "weight_kg": 68.5,
        "height_cm": 172,
        "resting_bpm": 58,
        "ai_extracted_data": { "schedule": "weekday mornings", "injuries": "none" }
    })
}

/// Store an unscored profile built from [`complete_extraction`]
pub async fn seed_profile(database: &Database, user_id: &str) -> UserProfile {
    let extraction: OnboardingExtraction =
        serde_json::from_value(complete_extraction(user_id)).unwrap();
    let profile = UserProfile::from_extraction(extraction, Some("endurance".to_owned()));
    database.upsert_profile(&profile).await.unwrap();
    profile
}
