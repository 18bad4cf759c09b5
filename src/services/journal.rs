// ABOUTME: Journal pipeline from raw entry to sentiment-aware wellness observation
// ABOUTME: Normalizes with the LLM, stores, scores sentiment, analyzes, and serves history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::complete_logged;
use crate::constants::coaching::JOURNAL_HISTORY_LIMIT;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{journal_output_prompt, JOURNAL_INPUT_PROMPT};
use crate::llm::{parse_json_reply, ChatMessage, ChatRequest, LlmProvider};
use crate::logging::AppLogger;
use crate::models::{JournalAnalysis, NormalizedJournal, UserJournal};
use crate::sentiment::SentimentAnalyzer;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One point on the client's weekly mood chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalHistoryEntry {
    /// Entry identifier
    pub journal_id: String,
    /// Short weekday name ("Mon")
    pub day: String,
    /// Short date ("Feb 13")
    pub date: String,
    /// Sentiment score, absent if analysis never completed
    pub sentiment: Option<f64>,
}

impl From<&UserJournal> for JournalHistoryEntry {
    fn from(journal: &UserJournal) -> Self {
        Self {
            journal_id: journal.journal_id.clone(),
            day: journal.created_at.format("%a").to_string(),
            date: journal.created_at.format("%b %-d").to_string(),
            sentiment: journal.sentiment_score,
        }
    }
}

/// Journal submission and history
pub struct JournalService {
    llm: Arc<dyn LlmProvider>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    database: Database,
    temperature: f32,
}

impl JournalService {
    /// Create the service
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        sentiment: Arc<dyn SentimentAnalyzer>,
        database: Database,
        temperature: f32,
    ) -> Self {
        Self {
            llm,
            sentiment,
            database,
            temperature,
        }
    }

    /// Process a new entry end to end.
    ///
    /// The entry is stored as soon as it is normalized, so a failure in
    /// sentiment scoring or analysis leaves it in history without a score.
    ///
    /// # Errors
    ///
    /// Returns invalid-input for an empty user id or entry, an
    /// external-service error when the normalizer reply carries no JSON
    /// object or any model call fails, and database errors from storage.
    #[instrument(skip(self, entry_text), fields(chars = entry_text.len()))]
    pub async fn submit(&self, user_id: &str, entry_text: &str) -> AppResult<JournalAnalysis> {
        if user_id.trim().is_empty() {
            return Err(AppError::invalid_input("user_id is required"));
        }
        if entry_text.trim().is_empty() {
            return Err(AppError::invalid_input("entry_text must not be empty"));
        }

        let normalized = self.normalize(entry_text).await?;
        let journal = UserJournal::new(user_id, entry_text, normalized);
        self.database.insert_journal(&journal).await?;
        if journal.safety_flag {
            AppLogger::log_safety_flag(user_id, &journal.journal_id);
        }

        let score = self.sentiment.score(&journal.cleaned_text).await?;
        debug!(backend = self.sentiment.name(), score, "Journal sentiment scored");

        let interests = self
            .database
            .get_goals(user_id)
            .await?
            .unwrap_or_default()
            .join(", ");

        let request = ChatRequest::new(vec![ChatMessage::user(journal_output_prompt(
            &journal.cleaned_text,
            score,
            &interests,
        ))])
        .with_temperature(self.temperature);
        let response = complete_logged(self.llm.as_ref(), "journal_analysis", &request).await?;
        let observation = response.content.trim().to_owned();

        self.database
            .attach_journal_analysis(
                &journal.journal_id,
                score,
                &json!({ "sentiment": score, "observation": observation }),
            )
            .await?;

        Ok(JournalAnalysis {
            journal_id: journal.journal_id,
            score,
            observation,
            tags: journal.context_tags,
            safety_flag: journal.safety_flag,
        })
    }

    /// Last week of entries, oldest first.
    ///
    /// Reads storage only, so history stays available without an LLM.
    ///
    /// # Errors
    ///
    /// Returns a database error if the entries cannot be read.
    pub async fn history(
        database: &Database,
        user_id: &str,
    ) -> AppResult<Vec<JournalHistoryEntry>> {
        let recent = database
            .recent_journals(user_id, JOURNAL_HISTORY_LIMIT)
            .await?;
        Ok(recent.iter().rev().map(JournalHistoryEntry::from).collect())
    }

    async fn normalize(&self, entry_text: &str) -> AppResult<NormalizedJournal> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(JOURNAL_INPUT_PROMPT),
            ChatMessage::user(format!("User Entry: {entry_text}")),
        ])
        .with_temperature(self.temperature)
        .with_json_mode();

        let response = complete_logged(self.llm.as_ref(), "journal_normalize", &request).await?;
        parse_json_reply::<NormalizedJournal>(&response.content, "journal normalization")?
            .ok_or_else(|| AppError::external_service("LLM", "failed to structure journal entry"))
    }
}
