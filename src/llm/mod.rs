// ABOUTME: LLM provider abstraction layer for the onboarding, journal, and schedule collaborators
// ABOUTME: Defines the provider contract, chat message types, and JSON extraction from replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! Services talk to a generative model through [`LlmProvider`]. The model is
//! an untrusted collaborator: its replies are free text that may or may not
//! contain the JSON object a prompt asked for, so structured results are
//! pulled out with [`extract_json_object`] and then deserialized leniently.
//!
//! ## Example: Using a Provider
//!
//! ```rust,no_run
//! use pierre_coach::llm::{ChatMessage, ChatRequest, LlmProvider};
//!
//! async fn example(provider: &dyn LlmProvider) {
//!     let messages = vec![
//!         ChatMessage::system("You are a data-entry clerk."),
//!         ChatMessage::user("Hi, I'm Sam and I want to run a marathon."),
//!     ];
//!
//!     let request = ChatRequest::new(messages).with_temperature(0.1);
//!     let response = provider.complete(&request).await;
//! }
//! ```

mod gemini;
/// Prompt templates for every collaborator
pub mod prompts;

pub use gemini::GeminiProvider;

use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// LLM provider capability flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider can be asked for a JSON document
        const JSON_MODE = 0b0000_0001;
        /// Provider accepts a separate system instruction
        const SYSTEM_MESSAGES = 0b0000_0010;
    }
}

impl LlmCapabilities {
    /// Check if JSON mode is supported
    #[must_use]
    pub const fn supports_json_mode(&self) -> bool {
        self.contains(Self::JSON_MODE)
    }

    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Ask the provider to emit a JSON document
    pub json_mode: bool,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            json_mode: false,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request JSON output where the provider supports it
    #[must_use]
    pub const fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    /// Downgrade the request to what a provider can honor.
    ///
    /// Without JSON mode the prompt alone asks for JSON. Without system
    /// messages the instructions are prepended to the first user turn.
    #[must_use]
    pub fn adapted_to(mut self, capabilities: LlmCapabilities) -> Self {
        if !capabilities.supports_json_mode() {
            self.json_mode = false;
        }
        if capabilities.supports_system_messages() {
            return self;
        }

        let (system, mut rest): (Vec<ChatMessage>, Vec<ChatMessage>) = self
            .messages
            .into_iter()
            .partition(|message| message.role == MessageRole::System);
        if !system.is_empty() {
            let instructions = system
                .into_iter()
                .map(|message| message.content)
                .collect::<Vec<_>>()
                .join("\n\n");
            match rest.iter_mut().find(|message| message.role == MessageRole::User) {
                Some(first_user) => {
                    first_user.content = format!("{instructions}\n\n{}", first_user.content);
                }
                None => rest.insert(0, ChatMessage::user(instructions)),
            }
        }
        self.messages = rest;
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Available models for this provider
    fn available_models(&self) -> &'static [&'static str];

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check if the provider is reachable and the API key is valid
    async fn health_check(&self) -> Result<bool, AppError>;
}

// ============================================================================
// Structured Reply Extraction
// ============================================================================

/// Outermost brace span: first `{` through last `}` across lines
static JSON_OBJECT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Find the outermost `{...}` span in a model reply and parse it.
///
/// Returns `None` when the reply has no brace span or the span is not a JSON
/// object. Markdown fences and chatter around the object are ignored.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Value> {
    let span = JSON_OBJECT_PATTERN.as_ref()?.find(text)?;
    match serde_json::from_str::<Value>(span.as_str()) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Extract a JSON object from a reply and deserialize it into `T`.
///
/// `Ok(None)` means the reply carried no JSON object at all.
///
/// # Errors
///
/// Returns an external-service error when an object is present but does not
/// have the shape `T` expects.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str, purpose: &str) -> AppResult<Option<T>> {
    let Some(value) = extract_json_object(text) else {
        return Ok(None);
    };
    serde_json::from_value(value).map(Some).map_err(|e| {
        AppError::external_service("LLM", format!("{purpose} reply has an unexpected shape: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_fenced_object() {
        let reply = "Great, here's your profile:\n```json\n{\n  \"user_id\": \"sam\",\n  \"goals\": [\"marathon\"]\n}\n```\nAnything else?";
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["user_id"], "sam");
        assert_eq!(value["goals"][0], "marathon");
    }

    #[test]
    fn test_no_object_in_plain_chat() {
        assert!(extract_json_object("How many days a week do you train?").is_none());
        assert!(extract_json_object("").is_none());
    }

    #[test]
    fn test_greedy_span_covers_nested_objects() {
        let reply = r#"{"a": {"b": 1}, "c": 2}"#;
        let value = extract_json_object(reply).unwrap();
        assert_eq!(value["a"]["b"], 1);
        assert_eq!(value["c"], 2);
    }

    #[test]
    fn test_unbalanced_span_is_not_an_object() {
        assert!(extract_json_object("use {braces} carefully { like this").is_none());
        assert!(extract_json_object("{not json}").is_none());
    }

    #[test]
    fn test_parse_reply_shape_mismatch_is_error() {
        #[derive(Debug, Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            cleaned_text: String,
        }

        assert!(parse_json_reply::<Needs>("no json here", "journal")
            .unwrap()
            .is_none());
        let err = parse_json_reply::<Needs>(r#"{"other": 1}"#, "journal").unwrap_err();
        assert!(err.message.contains("journal"));
    }

    #[test]
    fn test_full_capabilities_leave_request_alone() {
        let request = ChatRequest::new(vec![ChatMessage::system("clerk"), ChatMessage::user("hi")])
            .with_json_mode()
            .adapted_to(LlmCapabilities::JSON_MODE | LlmCapabilities::SYSTEM_MESSAGES);

        assert!(request.json_mode);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
    }

    #[test]
    fn test_plain_provider_gets_folded_instructions() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("You are a clerk."),
            ChatMessage::assistant("Hello!"),
            ChatMessage::user("I'm Sam"),
        ])
        .with_json_mode()
        .adapted_to(LlmCapabilities::empty());

        assert!(!request.json_mode);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].content, "You are a clerk.\n\nI'm Sam");
        assert!(request
            .messages
            .iter()
            .all(|message| message.role != MessageRole::System));
    }

    #[test]
    fn test_system_only_request_becomes_user_turn() {
        let request = ChatRequest::new(vec![ChatMessage::system("Rate this.")])
            .adapted_to(LlmCapabilities::JSON_MODE);

        assert_eq!(request.messages, vec![ChatMessage::user("Rate this.")]);
    }
}
