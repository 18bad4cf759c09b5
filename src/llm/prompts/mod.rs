// ABOUTME: Prompt templates for the onboarding clerk, journal normalizer, analyst, and planner
// ABOUTME: Templates are loaded at compile time and filled with simple placeholder substitution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! Prompts live next to this module as markdown and are embedded at compile
//! time. Templated prompts use `{{name}}` placeholders.

use crate::constants::coaching::DEFAULT_INTERESTS;
use crate::models::UserProfile;

/// Onboarding clerk: collects name, goals, weekly sessions, and schedule,
/// then emits the profile JSON object
pub const ONBOARDING_PROMPT: &str = include_str!("onboarding.md");

/// Journal normalizer: cleans the entry and emits tags plus the safety flag
pub const JOURNAL_INPUT_PROMPT: &str = include_str!("journal_input.md");

/// Journal analyst template
pub const JOURNAL_OUTPUT_TEMPLATE: &str = include_str!("journal_output.md");

/// Weekly schedule planner template
pub const SCHEDULE_PLANNER_TEMPLATE: &str = include_str!("schedule_planner.md");

/// Sentiment rater used by the LLM sentiment backend
pub const SENTIMENT_PROMPT: &str = include_str!("sentiment.md");

/// Substitute `{{key}}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned, so user text containing a
/// placeholder is kept verbatim. Unknown keys are left untouched.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (replacement, consumed) = tail[2..]
            .find("}}")
            .and_then(|end| {
                let key = &tail[2..2 + end];
                values
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (*value, end + 4))
            })
            .unwrap_or(("{{", 2));
        out.push_str(replacement);
        rest = &tail[consumed..];
    }
    out.push_str(rest);
    out
}

/// Render the journal analyst prompt.
///
/// Empty interests fall back to "General wellness".
#[must_use]
pub fn journal_output_prompt(cleaned_text: &str, sentiment_score: f64, interests: &str) -> String {
    let interests = if interests.trim().is_empty() {
        DEFAULT_INTERESTS
    } else {
        interests
    };
    fill(
        JOURNAL_OUTPUT_TEMPLATE,
        &[
            ("cleaned_text", cleaned_text),
            ("sentiment_score", &format!("{sentiment_score:.2}")),
            ("interests", interests),
        ],
    )
}

/// Render the schedule planner prompt for a profile
#[must_use]
pub fn schedule_planner_prompt(profile: &UserProfile) -> String {
    let goals = profile
        .goals_summary()
        .unwrap_or_else(|| DEFAULT_INTERESTS.to_owned());
    let constraints = if profile.ai_extracted_data.is_null() {
        "none recorded".to_owned()
    } else {
        profile.ai_extracted_data.to_string()
    };

    fill(
        SCHEDULE_PLANNER_TEMPLATE,
        &[
            ("goals", &goals),
            ("broad_goal", &profile.broad_goal),
            ("workouts_per_week", &profile.workouts_per_week.to_string()),
            ("experience_level", &profile.experience_level.to_string()),
            ("fitness_score", &format!("{:.2}", profile.fitness_score)),
            ("constraints", &constraints),
        ],
    )
}
