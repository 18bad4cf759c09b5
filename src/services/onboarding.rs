// ABOUTME: Conversational onboarding that turns a chat history into a scored profile
// ABOUTME: Drives the clerk prompt, detects the final JSON, and asks for missing body metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{complete_logged, FitnessScoringService};
use crate::constants::coaching::{
    AWAITING_INPUT_MESSAGE, BODY_METRICS, NEEDS_METRICS_MESSAGE, PROFILE_COMPLETE_MESSAGE,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::ONBOARDING_PROMPT;
use crate::llm::{parse_json_reply, ChatMessage, ChatRequest, LlmProvider};
use crate::models::{OnboardingExtraction, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

/// One chat turn as the web client sends it.
///
/// Only `"user"` marks the athlete; any other role is treated as the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Speaker
    pub role: String,
    /// Message text
    pub content: String,
}

impl ConversationTurn {
    fn is_user(&self) -> bool {
        self.role.trim().eq_ignore_ascii_case("user")
    }

    fn to_chat_message(&self) -> ChatMessage {
        if self.is_user() {
            ChatMessage::user(&self.content)
        } else {
            ChatMessage::assistant(&self.content)
        }
    }
}

/// Extraction waiting for body metrics, echoed back by the metrics form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialProfile {
    /// Data collected by the clerk plus any metrics added since
    #[serde(flatten)]
    pub extraction: OnboardingExtraction,
    /// Broad goal picked before the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broad_goal: Option<String>,
}

impl PartialProfile {
    fn missing_metrics(&self) -> Vec<String> {
        let missing = self.extraction.biometrics.missing_fields();
        BODY_METRICS
            .iter()
            .filter(|field| missing.contains(*field))
            .map(|field| (*field).to_owned())
            .collect()
    }
}

/// Result of one onboarding turn
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OnboardingOutcome {
    /// The clerk is still collecting data
    Chatting {
        /// Clerk reply to show the user
        message: String,
    },
    /// Conversation finished; the client must collect body metrics
    NeedsMetrics {
        /// Prompt for the metrics form
        message: String,
        /// Data to send back with the metrics
        partial_data: PartialProfile,
        /// Metrics still required
        missing_fields: Vec<String>,
    },
    /// Profile scored and stored
    Complete {
        /// Confirmation text
        message: String,
        /// Stored profile
        data: UserProfile,
    },
}

/// Onboarding conversation driver
pub struct OnboardingService {
    llm: Arc<dyn LlmProvider>,
    database: Database,
    scoring: FitnessScoringService,
    temperature: f32,
}

impl OnboardingService {
    /// Create the service
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        database: Database,
        scoring: FitnessScoringService,
        temperature: f32,
    ) -> Self {
        Self {
            llm,
            database,
            scoring,
            temperature,
        }
    }

    /// Advance the conversation by one clerk turn.
    ///
    /// # Errors
    ///
    /// Returns an external-service error when the model call fails or its
    /// JSON has the wrong shape, and a database error when the profile
    /// cannot be stored.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn process(
        &self,
        history: &[ConversationTurn],
        broad_goal: Option<String>,
    ) -> AppResult<OnboardingOutcome> {
        if !history.last().is_some_and(ConversationTurn::is_user) {
            return Ok(OnboardingOutcome::Chatting {
                message: AWAITING_INPUT_MESSAGE.to_owned(),
            });
        }

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(ONBOARDING_PROMPT));
        messages.extend(history.iter().map(ConversationTurn::to_chat_message));
        let request = ChatRequest::new(messages).with_temperature(self.temperature);

        let response = complete_logged(self.llm.as_ref(), "onboarding", &request).await?;
        let Some(extraction) =
            parse_json_reply::<OnboardingExtraction>(&response.content, "onboarding")?
        else {
            return Ok(OnboardingOutcome::Chatting {
                message: response.content.trim().to_owned(),
            });
        };

        if extraction.user_id.trim().is_empty() {
            return Err(AppError::external_service(
                "LLM",
                "onboarding reply has an empty user_id",
            ));
        }

        let partial = PartialProfile {
            extraction,
            broad_goal,
        };
        let missing_fields = partial.missing_metrics();
        if !missing_fields.is_empty() {
            info!(
                user_id = %partial.extraction.user_id,
                missing = ?missing_fields,
                "Onboarding needs body metrics"
            );
            return Ok(OnboardingOutcome::NeedsMetrics {
                message: NEEDS_METRICS_MESSAGE.to_owned(),
                partial_data: partial,
                missing_fields,
            });
        }

        self.finalize(partial).await
    }

    /// Finish a profile once the client supplied the body metrics
    ///
    /// # Errors
    ///
    /// Returns invalid-input when the user id or a body metric is still
    /// missing, and a database error when the profile cannot be stored.
    #[instrument(skip(self, partial), fields(user_id = %partial.extraction.user_id))]
    pub async fn complete_profile(&self, partial: PartialProfile) -> AppResult<OnboardingOutcome> {
        if partial.extraction.user_id.trim().is_empty() {
            return Err(AppError::invalid_input("user_id is required"));
        }

        let missing = partial.missing_metrics();
        if !missing.is_empty() {
            return Err(AppError::invalid_input(format!(
                "missing body metrics: {}",
                missing.join(", ")
            ))
            .with_details(json!({ "missing_fields": missing })));
        }

        self.finalize(partial).await
    }

    async fn finalize(&self, partial: PartialProfile) -> AppResult<OnboardingOutcome> {
        let mut profile = UserProfile::from_extraction(partial.extraction, partial.broad_goal);
        let result = self
            .scoring
            .score_input(&profile.biometrics(), Some(&profile.user_id));
        profile.fitness_score = result.fitness_score;
        profile.experience_level = result.experience_level;

        self.database.upsert_profile(&profile).await?;
        info!(
            user_id = %profile.user_id,
            fitness_score = profile.fitness_score,
            experience_level = %profile.experience_level,
            "Onboarding complete"
        );

        Ok(OnboardingOutcome::Complete {
            message: PROFILE_COMPLETE_MESSAGE.to_owned(),
            data: profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_role_counts_as_user() {
        let user = ConversationTurn {
            role: "User".to_owned(),
            content: "hi".to_owned(),
        };
        let model = ConversationTurn {
            role: "model".to_owned(),
            content: "hello".to_owned(),
        };
        assert!(user.is_user());
        assert!(!model.is_user());
        assert_eq!(model.to_chat_message(), ChatMessage::assistant("hello"));
    }

    #[test]
    fn test_partial_profile_round_trips_form_payload() {
        let partial: PartialProfile = serde_json::from_value(json!({
            "user_id": "sam",
            "goals": ["marathon"],
            "workouts_per_week": 3,
            "ai_extracted_data": { "schedule": "mornings" },
            "age": 31,
            "weight_kg": null,
            "broad_goal": "Staying Active"
        }))
        .unwrap();

        assert_eq!(partial.broad_goal.as_deref(), Some("Staying Active"));
        assert_eq!(
            partial.missing_metrics(),
            vec!["weight_kg", "height_cm", "resting_bpm"]
        );

        let echoed = serde_json::to_value(&partial).unwrap();
        assert_eq!(echoed["user_id"], "sam");
        assert_eq!(echoed["broad_goal"], "Staying Active");
    }

    #[test]
    fn test_workouts_are_not_a_body_metric() {
        let partial: PartialProfile = serde_json::from_value(json!({
            "user_id": "kai",
            "age": 40,
            "weight_kg": 80,
            "height_cm": 180,
            "resting_bpm": 62
        }))
        .unwrap();
        assert!(partial.missing_metrics().is_empty());
    }
}
