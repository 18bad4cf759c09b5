// ABOUTME: Google Gemini LLM provider implementation over the generateContent REST API
// ABOUTME: Handles system instructions, JSON mode, usage metadata, and quota error mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models.
//!
//! ## Configuration
//!
//! Set the `GEMINI_API_KEY` environment variable with your API key from
//! Google AI Studio. `LLM_MODEL` overrides the default model.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pierre_coach::llm::{ChatMessage, ChatRequest, GeminiProvider, LlmProvider};
//! use pierre_coach::errors::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let provider = GeminiProvider::new("api-key")?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Suggest a warm-up.")]);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole, TokenUsage,
};
use crate::config::LlmConfig;
use crate::constants::defaults;
use crate::errors::{AppError, AppResult, ErrorCode};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Available Gemini models
const AVAILABLE_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
];

/// Base URL for the Gemini API
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// MIME type requested in JSON mode
const JSON_MIME_TYPE: &str = "application/json";

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    default_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider with the default model and request timeout
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(api_key, Duration::from_secs(defaults::LLM_TIMEOUT_SECS))
    }

    /// Create a provider with an explicit request timeout
    ///
    /// # Errors
    ///
    /// Returns a config error if the HTTP client cannot be built.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build Gemini HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            client,
            default_model: defaults::LLM_MODEL.to_owned(),
            base_url: API_BASE_URL.to_owned(),
        })
    }

    /// Create a provider from server configuration
    ///
    /// # Errors
    ///
    /// Returns a config error when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> AppResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::new(ErrorCode::ConfigMissing, "GEMINI_API_KEY is not set"))?;

        Ok(Self::with_timeout(api_key, Duration::from_secs(config.timeout_secs))?
            .with_default_model(&config.model))
    }

    /// Set a custom default model
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Point the provider at another API root (proxies, local fakes)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// System messages travel separately; anything else is user or model
    const fn convert_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::System | MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }

    fn build_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{model}:{method}?key={}",
            self.base_url, self.api_key
        )
    }

    fn text_content(role: Option<String>, text: &str) -> GeminiContent {
        GeminiContent {
            role,
            parts: vec![TextPart {
                text: text.to_owned(),
            }],
        }
    }

    /// Split out the system instruction; multiple system messages are concatenated
    fn convert_messages(messages: &[ChatMessage]) -> (Vec<GeminiContent>, Option<GeminiContent>) {
        let mut contents = Vec::new();
        let mut system_parts: Vec<&str> = Vec::new();

        for message in messages {
            if message.role == MessageRole::System {
                system_parts.push(&message.content);
            } else {
                contents.push(Self::text_content(
                    Some(Self::convert_role(message.role).to_owned()),
                    &message.content,
                ));
            }
        }

        let system_instruction = (!system_parts.is_empty())
            .then(|| Self::text_content(None, &system_parts.join("\n\n")));
        (contents, system_instruction)
    }

    fn build_gemini_request(request: &ChatRequest) -> GeminiRequest {
        let (contents, system_instruction) = Self::convert_messages(&request.messages);

        let wants_config = request.temperature.is_some() || request.json_mode;
        let generation_config = wants_config.then(|| GenerationConfig {
            temperature: request.temperature,
            candidate_count: Some(1),
            response_mime_type: request.json_mode.then_some(JSON_MIME_TYPE),
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_content(response: &GeminiResponse) -> AppResult<String> {
        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| AppError::external_service("Gemini", "response has no candidates"))?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(AppError::external_service(
                "Gemini",
                format!("empty completion (finish reason: {reason})"),
            ));
        }
        Ok(text)
    }

    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map API error status to the matching external-service error code
    fn map_api_error(status: u16, response_text: &str) -> AppError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);

        match status {
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                Self::extract_quota_message(&message),
            ),
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("Gemini rejected the API key ({status})"),
            ),
            500..=599 => AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("Gemini API unavailable ({status}): {message}"),
            ),
            _ => AppError::external_service("Gemini", format!("API error ({status}): {message}")),
        }
    }

    /// Turn "Please retry in 6.4s" into a whole-second hint for the client
    fn extract_quota_message(message: &str) -> String {
        const PREFIX: &str = "Please retry in ";
        let seconds = message.find(PREFIX).and_then(|pos| {
            let after_prefix = &message[pos + PREFIX.len()..];
            let end = after_prefix.find('s')?;
            after_prefix[..end].parse::<f64>().ok()
        });

        seconds.map_or_else(
            || "AI service quota exceeded. Please wait a moment and try again.".to_owned(),
            |s| {
                format!(
                    "AI service quota exceeded. Please try again in {} seconds.",
                    s.ceil() as u64
                )
            },
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(
        skip(self, request),
        fields(model = %request.model.as_deref().unwrap_or(&self.default_model))
    )]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let url = self.build_url(model, "generateContent");
        let gemini_request = Self::build_gemini_request(request);

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("Gemini request failed: {e}"),
                )
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            AppError::external_service("Gemini", format!("failed to read response: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Gemini response");
                AppError::external_service("Gemini", format!("unparseable response: {e}"))
            })?;

        if let Some(error) = gemini_response.error {
            return Err(AppError::external_service("Gemini", error.message));
        }

        let content = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.clone());

        debug!(
            total_tokens = usage.map_or(0, |u| u.total_tokens),
            "Received Gemini response"
        );

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!("Gemini health check failed: {e}"),
            )
        })?;

        Ok(response.status().is_success())
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("default_model", &self.default_model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_become_instruction() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a clerk."),
            ChatMessage::user("Hi"),
            ChatMessage::assistant("What's your name?"),
            ChatMessage::user("Sam"),
        ])
        .with_temperature(0.1)
        .with_json_mode();

        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();
        assert_eq!(body["system_instruction"]["parts"][0]["text"], "You are a clerk.");
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generation_config"]["response_mime_type"], JSON_MIME_TYPE);
    }

    #[test]
    fn test_plain_request_has_no_generation_config() {
        let request = ChatRequest::new(vec![ChatMessage::user("Hi")]);
        let body = serde_json::to_value(GeminiProvider::build_gemini_request(&request)).unwrap();
        assert!(body.get("generation_config").is_none());
        assert!(body.get("system_instruction").is_none());
    }

    #[test]
    fn test_quota_message_rounds_up() {
        let message = GeminiProvider::extract_quota_message(
            "Resource exhausted. Please retry in 6.406453963s.",
        );
        assert_eq!(
            message,
            "AI service quota exceeded. Please try again in 7 seconds."
        );
        assert!(GeminiProvider::extract_quota_message("quota").contains("wait a moment"));
    }

    #[test]
    fn test_error_status_mapping() {
        let body = r#"{"error": {"message": "API key not valid"}}"#;
        assert_eq!(
            GeminiProvider::map_api_error(403, body).code,
            ErrorCode::ExternalAuthFailed
        );
        assert_eq!(
            GeminiProvider::map_api_error(429, body).code,
            ErrorCode::ExternalRateLimited
        );
        assert_eq!(
            GeminiProvider::map_api_error(503, "down").code,
            ErrorCode::ExternalServiceUnavailable
        );
        let bad_request = GeminiProvider::map_api_error(400, body);
        assert_eq!(bad_request.code, ErrorCode::ExternalServiceError);
        assert!(bad_request.message.contains("API key not valid"));
    }

    #[test]
    fn test_empty_candidate_is_error() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}]}"#,
        )
        .unwrap();
        let err = GeminiProvider::extract_content(&response).unwrap_err();
        assert!(err.message.contains("SAFETY"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = GeminiProvider::new("very-secret").unwrap();
        assert!(!format!("{provider:?}").contains("very-secret"));
    }
}
