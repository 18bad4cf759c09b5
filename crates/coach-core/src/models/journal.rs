// ABOUTME: Journal entry models for normalization, sentiment, and wellness analysis
// ABOUTME: Defines the LLM normalization shape, stored entries, and the analysis response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lenient;
use crate::constants::coaching::JOURNAL_ID_PREFIX;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Normalized entry returned by the journal input prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedJournal {
    /// Entry rewritten for clarity
    pub cleaned_text: String,
    /// Detected context such as "stress" or "low_sleep"
    #[serde(default)]
    pub context_tags: Vec<String>,
    /// High-distress language detected
    #[serde(default, deserialize_with = "lenient::flag")]
    pub safety_flag: bool,
}

/// Stored journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserJournal {
    /// Journal identifier (`jrnl_<timestamp>_<suffix>`)
    pub journal_id: String,
    /// Owner
    pub user_id: String,
    /// Raw text as submitted
    pub text: String,
    /// Normalized text
    pub cleaned_text: String,
    /// Context tags
    pub context_tags: Vec<String>,
    /// High-distress flag
    pub safety_flag: bool,
    /// Sentiment score in [-1, 1], once computed
    pub sentiment_score: Option<f64>,
    /// Sentiment plus generated recommendations
    pub analysis_results: Value,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl UserJournal {
    /// Create a new entry from raw text and its normalization
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        text: impl Into<String>,
        normalized: NormalizedJournal,
    ) -> Self {
        let created_at = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        let journal_id = format!(
            "{JOURNAL_ID_PREFIX}{}_{}",
            created_at.format("%Y%m%d%H%M%S"),
            &suffix[..8]
        );

        Self {
            journal_id,
            user_id: user_id.into(),
            text: text.into(),
            cleaned_text: normalized.cleaned_text,
            context_tags: normalized.context_tags,
            safety_flag: normalized.safety_flag,
            sentiment_score: None,
            analysis_results: Value::Null,
            created_at,
        }
    }
}

/// Analysis returned to the client after a journal submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalAnalysis {
    /// Stored entry identifier
    pub journal_id: String,
    /// Sentiment score in [-1, 1]
    pub score: f64,
    /// Clinical observation and recommendations
    pub observation: String,
    /// Context tags
    pub tags: Vec<String>,
    /// High-distress flag
    pub safety_flag: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_flag_accepts_priority_string() {
        let normalized: NormalizedJournal = serde_json::from_value(serde_json::json!({
            "cleaned_text": "Slept badly.",
            "context_tags": ["low_sleep"],
            "safety_flag": "high_priority"
        }))
        .unwrap();
        assert!(normalized.safety_flag);

        let normalized: NormalizedJournal =
            serde_json::from_value(serde_json::json!({ "cleaned_text": "Good run." })).unwrap();
        assert!(!normalized.safety_flag);
        assert!(normalized.context_tags.is_empty());
    }

    #[test]
    fn test_journal_id_format() {
        let normalized = NormalizedJournal {
            cleaned_text: "Felt strong today.".to_owned(),
            context_tags: vec!["accomplishment".to_owned()],
            safety_flag: false,
        };
        let journal = UserJournal::new("sam", "felt strong today!!", normalized);

        assert!(journal.journal_id.starts_with(JOURNAL_ID_PREFIX));
        // prefix + 14 timestamp digits + '_' + 8 hex chars
        assert_eq!(journal.journal_id.len(), JOURNAL_ID_PREFIX.len() + 14 + 1 + 8);
        assert!(journal.sentiment_score.is_none());
    }
}
