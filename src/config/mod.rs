// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Exposes the environment-driven ServerConfig and its typed sub-configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for Pierre Coach
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file). There are no configuration files.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CorsConfig, DatabaseConfig, DatabaseUrl, Environment, LlmConfig, LogLevel, ModelConfig,
    SentimentBackend, ServerConfig,
};
