// ABOUTME: Core data models for the Pierre Coach platform
// ABOUTME: Re-exports biometric inputs, experience tiers, profiles, journals, and schedules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! ## Core Models
//!
//! - `BiometricInput`: validated biometrics consumed by the fitness-score pipeline
//! - `RawBiometricPayload`: lenient boundary type with explicit defaulting rules
//! - `ExperienceLevel`: ordinal experience tier (1 beginner, 2 intermediate, 3 expert)
//! - `UserProfile`: onboarded athlete profile with persisted model outputs
//! - `UserJournal`: journal entry with normalization and sentiment analysis
//! - `WeeklySchedule`: generated training week
//! - `WorkoutLog`: completed session counted toward the weekly target

mod biometrics;
mod experience;
mod journal;
mod profile;
mod schedule;
mod workout;

pub use biometrics::{BiometricInput, RawBiometricPayload};
pub use experience::ExperienceLevel;
pub use journal::{JournalAnalysis, NormalizedJournal, UserJournal};
pub use profile::{OnboardingExtraction, UserProfile};
pub use schedule::{ScheduledSession, StoredSchedule, WeeklySchedule};
pub use workout::{week_start, WorkoutLog, WorkoutStats};

pub(crate) mod lenient {
    //! Serde helpers that coerce loosely typed JSON (LLM output, web forms) into numbers
    //! and flags, mapping anything non-coercible to `None`.

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn coerce_f64(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(coerce_f64))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "high_priority"
            ),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
            _ => false,
        })
    }
}
