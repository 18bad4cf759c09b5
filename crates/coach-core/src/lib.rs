// ABOUTME: Core types and constants for the Pierre Coach platform
// ABOUTME: Foundation crate with error handling, biometric models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coach Core
//!
//! Foundation crate providing shared types and constants for the Pierre Coach
//! platform. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ModelError`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Biometric inputs, experience tiers, profiles, and journals

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Core data models (biometrics, experience tiers, profiles, journals)
pub mod models;
