// ABOUTME: Athlete profile models produced by conversational onboarding
// ABOUTME: Holds goals, biometrics, and the persisted fitness score and experience tier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::biometrics::{BiometricInput, RawBiometricPayload};
use super::experience::ExperienceLevel;
use crate::constants::coaching::{DEFAULT_BROAD_GOAL, DEFAULT_TARGET_CALORIES};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON object emitted by the onboarding model once every data point is confirmed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingExtraction {
    /// User name or handle chosen during the conversation
    pub user_id: String,
    /// Specific goals (e.g. "marathon")
    #[serde(default)]
    pub goals: Vec<String>,
    /// Biometrics collected during the conversation
    #[serde(flatten)]
    pub biometrics: RawBiometricPayload,
    /// Free-form data such as schedule and injuries
    #[serde(default)]
    pub ai_extracted_data: Value,
    /// Calorie target if the model proposed one
    #[serde(default)]
    pub target_calories: Option<i64>,
}

/// Persisted athlete profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub user_id: String,
    /// Broad goal picked in the client (weight loss, strength, ...)
    pub broad_goal: String,
    /// Specific goals extracted by the onboarding model
    pub goals: Vec<String>,
    /// Workout sessions per week
    pub workouts_per_week: u32,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Height in centimetres
    pub height_cm: f64,
    /// Age in years
    pub age: f64,
    /// Resting heart rate
    pub resting_bpm: f64,
    /// Experience tier from the fitness model
    pub experience_level: ExperienceLevel,
    /// Probability of the expert class, two decimals
    pub fitness_score: f64,
    /// Daily calorie target
    pub target_calories: i64,
    /// Schedule, injuries, and other extracted details
    pub ai_extracted_data: Value,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build an unscored profile from an onboarding extraction
    #[must_use]
    pub fn from_extraction(extraction: OnboardingExtraction, broad_goal: Option<String>) -> Self {
        let biometrics = extraction.biometrics.into_input();
        let now = Utc::now();

        Self {
            user_id: extraction.user_id,
            broad_goal: broad_goal.unwrap_or_else(|| DEFAULT_BROAD_GOAL.to_owned()),
            goals: extraction.goals,
            workouts_per_week: biometrics.workouts_per_week,
            weight_kg: biometrics.weight_kg,
            height_cm: biometrics.height_cm,
            age: biometrics.age,
            resting_bpm: biometrics.resting_bpm,
            experience_level: ExperienceLevel::default(),
            fitness_score: 0.0,
            target_calories: extraction
                .target_calories
                .unwrap_or(DEFAULT_TARGET_CALORIES),
            ai_extracted_data: extraction.ai_extracted_data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Biometric attributes read by the fitness-score pipeline
    #[must_use]
    pub const fn biometrics(&self) -> BiometricInput {
        BiometricInput::new(
            self.age,
            self.weight_kg,
            self.height_cm,
            self.resting_bpm,
            self.workouts_per_week,
        )
    }

    /// Goals rendered for prompts, or `None` when the user has none
    #[must_use]
    pub fn goals_summary(&self) -> Option<String> {
        (!self.goals.is_empty()).then(|| self.goals.join(", "))
    }
}
