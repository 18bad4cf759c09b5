// ABOUTME: Main library entry point for the Pierre Coach fitness-coaching API
// ABOUTME: Wires configuration, persistence, LLM collaborators, services, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach
//!
//! Backend for a conversational fitness coach. Athletes onboard through a
//! chat with a data-entry model, write journal entries that are normalized and
//! scored for sentiment, and receive a fitness score from a logistic model
//! trained offline on gym-member data.
//!
//! ## Architecture
//!
//! - **Config**: environment-only server configuration
//! - **Database**: `SQLite` persistence for profiles, journals, schedules, and workouts
//! - **LLM**: provider abstraction with a Gemini implementation and prompt templates
//! - **Sentiment**: pluggable journal sentiment scorers
//! - **Services**: onboarding, journaling, fitness scoring, schedules, and workout stats
//! - **Routes**: axum HTTP surface over the services
//!
//! The fitness-score pipeline itself lives in the `coach-intelligence` crate.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_coach::config::environment::ServerConfig;
//! use pierre_coach::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Pierre Coach configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// `SQLite` persistence layer
pub mod database;

/// LLM provider abstraction and prompt templates
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware: CORS and request ids
pub mod middleware;

/// Shared server resources handed to every route
pub mod resources;

/// `HTTP` routes
pub mod routes;

/// Journal sentiment scoring
pub mod sentiment;

/// Business logic behind the routes
pub mod services;

/// Unified error handling system with standard error codes and HTTP responses
pub use coach_core::errors;

/// Application constants organized by domain
pub use coach_core::constants;

/// Core data models
pub use coach_core::models;

/// Fitness-score pipeline
pub use coach_intelligence as intelligence;
