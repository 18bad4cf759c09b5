// ABOUTME: Deterministic word-list sentiment scorer for journal entries
// ABOUTME: Handles negation, intensifiers, and normalizes the summed valence into [-1, 1]
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::SentimentAnalyzer;
use crate::errors::AppResult;
use async_trait::async_trait;
use std::collections::HashMap;

/// Normalization constant: `sum / sqrt(sum^2 + ALPHA)`
const ALPHA: f64 = 15.0;

/// Tokens after a negator whose valence is flipped
const NEGATION_WINDOW: usize = 3;

/// Valence multiplier after a negator
const NEGATION_FACTOR: f64 = -0.75;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "without", "hardly", "barely",
    "cannot", "cant", "dont", "didnt", "doesnt", "isnt", "wasnt", "wont", "wouldnt", "couldnt",
    "shouldnt", "arent", "werent", "havent", "hasnt",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 1.8),
    ("so", 1.3),
    ("super", 1.5),
    ("totally", 1.4),
    ("incredibly", 1.7),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("kinda", 0.7),
];

const VALENCE: &[(&str, f64)] = &[
    // positive
    ("good", 1.9),
    ("great", 3.1),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("happy", 2.7),
    ("calm", 1.3),
    ("relaxed", 2.2),
    ("rested", 1.6),
    ("refreshed", 2.1),
    ("strong", 2.3),
    ("energized", 2.2),
    ("energetic", 2.0),
    ("proud", 2.3),
    ("accomplished", 2.0),
    ("motivated", 1.9),
    ("confident", 2.2),
    ("better", 1.9),
    ("best", 3.2),
    ("love", 3.2),
    ("loved", 2.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("fun", 2.3),
    ("grateful", 2.0),
    ("peaceful", 2.2),
    ("productive", 1.8),
    ("progress", 1.8),
    ("fresh", 1.3),
    ("fine", 0.8),
    ("ok", 0.9),
    ("okay", 0.9),
    ("nice", 1.8),
    ("win", 2.8),
    ("crushed", 1.5),
    ("pr", 2.0),
    // negative
    ("bad", -2.5),
    ("terrible", -2.9),
    ("awful", -2.8),
    ("horrible", -2.5),
    ("sad", -2.1),
    ("depressed", -2.9),
    ("anxious", -1.7),
    ("anxiety", -1.9),
    ("stressed", -2.0),
    ("stress", -1.8),
    ("tired", -1.4),
    ("exhausted", -1.8),
    ("drained", -1.6),
    ("sore", -1.2),
    ("pain", -2.3),
    ("hurt", -2.4),
    ("injured", -2.2),
    ("sick", -2.1),
    ("angry", -2.3),
    ("frustrated", -2.1),
    ("annoyed", -1.7),
    ("lonely", -2.0),
    ("worried", -1.9),
    ("overwhelmed", -1.9),
    ("hopeless", -3.1),
    ("worthless", -3.0),
    ("hate", -2.7),
    ("ugly", -2.3),
    ("fat", -1.0),
    ("weak", -1.9),
    ("lazy", -1.5),
    ("failed", -2.3),
    ("failure", -2.7),
    ("worse", -2.1),
    ("worst", -3.1),
    ("skipped", -0.9),
    ("insomnia", -1.9),
    ("sluggish", -1.4),
    ("miserable", -2.9),
];

/// Word-list sentiment scorer
#[derive(Debug, Clone)]
pub struct LexiconSentimentAnalyzer {
    valence: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentimentAnalyzer {
    /// Build the analyzer with the built-in word lists
    #[must_use]
    pub fn new() -> Self {
        Self {
            valence: VALENCE.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Synchronous scoring used by the async trait method
    #[must_use]
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut sum = 0.0;
        let mut negated_for = 0usize;
        let mut boost = 1.0;

        for token in &tokens {
            if NEGATORS.contains(&token.as_str()) {
                negated_for = NEGATION_WINDOW;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token.as_str()) {
                boost *= factor;
                continue;
            }

            if let Some(&valence) = self.valence.get(token.as_str()) {
                let mut value = valence * boost;
                if negated_for > 0 {
                    value *= NEGATION_FACTOR;
                }
                sum += value;
            }
            boost = 1.0;
            negated_for = negated_for.saturating_sub(1);
        }

        normalize(sum)
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentimentAnalyzer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    async fn score(&self, text: &str) -> AppResult<f64> {
        Ok(self.polarity(text))
    }
}

/// Lowercase words with apostrophes dropped ("didn't" -> "didnt")
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|word| {
            word.chars()
                .filter(|c| *c != '\'' && *c != '\u{2019}')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn normalize(sum: f64) -> f64 {
    if sum.abs() < f64::EPSILON {
        return 0.0;
    }
    (sum / sum.mul_add(sum, ALPHA).sqrt()).clamp(-1.0, 1.0)
}
