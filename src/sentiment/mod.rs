// ABOUTME: Journal sentiment scoring behind a pluggable analyzer trait
// ABOUTME: Provides a deterministic lexicon scorer and an LLM-backed scorer, both in [-1, 1]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sentiment
//!
//! Journal entries get a polarity score in `[-1, 1]` before they are handed
//! to the journal analyst prompt. Two backends are available:
//!
//! - [`LexiconSentimentAnalyzer`]: word-list scorer with negation and
//!   intensifier handling. Deterministic and offline.
//! - [`LlmSentimentAnalyzer`]: asks the configured model for a score and
//!   clamps whatever comes back.

mod lexicon;

pub use lexicon::LexiconSentimentAnalyzer;

use crate::errors::{AppError, AppResult};
use crate::llm::prompts::SENTIMENT_PROMPT;
use crate::llm::{extract_json_object, ChatMessage, ChatRequest, LlmProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Scores the polarity of free text
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Backend identifier for logs
    fn name(&self) -> &'static str;

    /// Polarity in `[-1, 1]`; text with no sentiment scores `0.0`
    async fn score(&self, text: &str) -> AppResult<f64>;
}

/// Sentiment scorer that delegates to a generative model
pub struct LlmSentimentAnalyzer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmSentimentAnalyzer {
    /// Wrap a provider
    #[must_use]
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Read a score from `{"score": x}` or a bare number, then clamp it
    fn parse_score(reply: &str) -> Option<f64> {
        let raw = extract_json_object(reply).map_or_else(
            || reply.trim().parse::<f64>().ok(),
            |value| match value.get("score") {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                _ => None,
            },
        )?;
        raw.is_finite().then(|| raw.clamp(-1.0, 1.0))
    }
}

#[async_trait]
impl SentimentAnalyzer for LlmSentimentAnalyzer {
    fn name(&self) -> &'static str {
        "llm"
    }

    #[instrument(skip(self, text), fields(provider = self.llm.name(), chars = text.len()))]
    async fn score(&self, text: &str) -> AppResult<f64> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }

        let request = ChatRequest::new(vec![
            ChatMessage::system(SENTIMENT_PROMPT),
            ChatMessage::user(text),
        ])
        .with_temperature(0.0)
        .with_json_mode()
        .adapted_to(self.llm.capabilities());

        let response = self.llm.complete(&request).await?;
        let score = Self::parse_score(&response.content).ok_or_else(|| {
            AppError::external_service("LLM", "sentiment reply did not contain a numeric score")
        })?;
        debug!(score, "LLM sentiment scored");
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_variants() {
        assert_eq!(LlmSentimentAnalyzer::parse_score(r#"{"score": 0.4}"#), Some(0.4));
        assert_eq!(LlmSentimentAnalyzer::parse_score(r#"{"score": "-0.25"}"#), Some(-0.25));
        assert_eq!(LlmSentimentAnalyzer::parse_score(" 0.9 "), Some(0.9));
        assert_eq!(LlmSentimentAnalyzer::parse_score(r#"{"score": 3}"#), Some(1.0));
        assert_eq!(LlmSentimentAnalyzer::parse_score(r#"{"score": -7.5}"#), Some(-1.0));
        assert_eq!(LlmSentimentAnalyzer::parse_score("quite positive"), None);
        assert_eq!(LlmSentimentAnalyzer::parse_score(r#"{"mood": 1}"#), None);
    }
}
