// ABOUTME: Centralized resource container shared by every HTTP handler
// ABOUTME: Holds config, database, fitness model, LLM provider, and sentiment backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources Module
//!
//! Expensive shared state is built once at startup and handed to the router
//! as `Arc<ServerResources>`. Services are cheap views over these resources
//! and are created per request.

use crate::config::{SentimentBackend, ServerConfig};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::intelligence::FitnessModel;
use crate::llm::LlmProvider;
use crate::sentiment::{LexiconSentimentAnalyzer, LlmSentimentAnalyzer, SentimentAnalyzer};
use crate::services::{
    FitnessScoringService, JournalService, OnboardingService, ScheduleService, WorkoutService,
};
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Database pool
    pub database: Database,
    /// Read-only fitness model
    pub model: Arc<FitnessModel>,
    /// Generative model; `None` disables the LLM-backed endpoints
    pub llm: Option<Arc<dyn LlmProvider>>,
    /// Journal sentiment scorer
    pub sentiment: Arc<dyn SentimentAnalyzer>,
}

impl ServerResources {
    /// Fitness scoring over the shared model
    #[must_use]
    pub fn fitness_scoring(&self) -> FitnessScoringService {
        FitnessScoringService::new(Arc::clone(&self.model), self.database.clone())
    }

    /// Onboarding conversation driver
    ///
    /// # Errors
    ///
    /// Returns unavailable when no LLM is configured.
    pub fn onboarding(&self) -> AppResult<OnboardingService> {
        Ok(OnboardingService::new(
            self.require_llm()?,
            self.database.clone(),
            self.fitness_scoring(),
            self.config.llm.onboarding_temperature,
        ))
    }

    /// Journal pipeline
    ///
    /// # Errors
    ///
    /// Returns unavailable when no LLM is configured.
    pub fn journal(&self) -> AppResult<JournalService> {
        Ok(JournalService::new(
            self.require_llm()?,
            Arc::clone(&self.sentiment),
            self.database.clone(),
            self.config.llm.journal_temperature,
        ))
    }

    /// Weekly schedule planner
    ///
    /// # Errors
    ///
    /// Returns unavailable when no LLM is configured.
    pub fn schedule(&self) -> AppResult<ScheduleService> {
        Ok(ScheduleService::new(
            self.require_llm()?,
            self.database.clone(),
            self.config.llm.journal_temperature,
        ))
    }

    /// Workout tracking
    #[must_use]
    pub fn workouts(&self) -> WorkoutService {
        WorkoutService::new(self.database.clone())
    }

    fn require_llm(&self) -> AppResult<Arc<dyn LlmProvider>> {
        self.llm.clone().ok_or_else(|| {
            AppError::unavailable("LLM features are disabled: GEMINI_API_KEY is not set")
        })
    }
}

/// Builder for [`ServerResources`]
#[derive(Default)]
pub struct ServerResourcesBuilder {
    config: Option<Arc<ServerConfig>>,
    database: Option<Database>,
    model: Option<Arc<FitnessModel>>,
    llm: Option<Arc<dyn LlmProvider>>,
    sentiment: Option<Arc<dyn SentimentAnalyzer>>,
}

impl ServerResourcesBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration
    #[must_use]
    pub fn with_config(mut self, config: Arc<ServerConfig>) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the database
    #[must_use]
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Set the fitness model
    #[must_use]
    pub fn with_model(mut self, model: Arc<FitnessModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the LLM provider
    #[must_use]
    pub fn with_llm(mut self, llm: Arc<dyn LlmProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Override the sentiment backend chosen by the configuration
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Build the `ServerResources`
    ///
    /// # Errors
    ///
    /// Returns a config error if a required part is missing, or if the LLM
    /// sentiment backend is selected without an LLM provider.
    pub fn build(self) -> AppResult<ServerResources> {
        let config = self
            .config
            .ok_or_else(|| AppError::config("Server config is required"))?;
        let database = self
            .database
            .ok_or_else(|| AppError::config("Database is required"))?;
        let model = self
            .model
            .ok_or_else(|| AppError::config("Fitness model is required"))?;

        let sentiment = match (self.sentiment, config.sentiment, &self.llm) {
            (Some(sentiment), _, _) => sentiment,
            (None, SentimentBackend::Lexicon, _) => {
                Arc::new(LexiconSentimentAnalyzer::new()) as Arc<dyn SentimentAnalyzer>
            }
            (None, SentimentBackend::Llm, Some(llm)) => {
                Arc::new(LlmSentimentAnalyzer::new(Arc::clone(llm)))
            }
            (None, SentimentBackend::Llm, None) => {
                return Err(AppError::config(
                    "LLM sentiment backend requires an LLM provider",
                ))
            }
        };

        Ok(ServerResources {
            config,
            database,
            model,
            llm: self.llm,
            sentiment,
        })
    }

    /// Build the `ServerResources` wrapped in an `Arc`
    ///
    /// # Errors
    ///
    /// Returns an error if any required fields are missing
    pub fn build_arc(self) -> AppResult<Arc<ServerResources>> {
        Ok(Arc::new(self.build()?))
    }
}
