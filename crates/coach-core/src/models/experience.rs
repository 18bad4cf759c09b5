// ABOUTME: Experience tier model mapping between dataset labels and classifier outputs
// ABOUTME: Encodes the 3-level ordinal scale and the binary expert/not-expert collapse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::fitness_model::EXPERT_LEVEL;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal experience tier, serialized as its integer value (1, 2, 3).
///
/// The fitness classifier is binary (expert vs. not expert) and its output is
/// mapped as `predicted_class + 1`, so inference only ever yields `Beginner`
/// or `Intermediate`. `Expert` is reachable from training labels and stored
/// profiles, not from scoring.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ExperienceLevel {
    /// Tier 1
    #[default]
    Beginner = 1,
    /// Tier 2
    Intermediate = 2,
    /// Tier 3
    Expert = 3,
}

impl ExperienceLevel {
    /// Map a binary classifier decision onto the ordinal scale (`class + 1`)
    #[must_use]
    pub const fn from_binary_class(positive: bool) -> Self {
        if positive {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    /// Binary training target for a dataset label: 1 iff the label is expert
    #[must_use]
    pub const fn is_expert_label(level: u8) -> bool {
        level == EXPERT_LEVEL
    }

    /// Integer value of the tier
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase tier name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl From<ExperienceLevel> for u8 {
    fn from(level: ExperienceLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for ExperienceLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Beginner),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::Expert),
            other => Err(AppError::invalid_input(format!(
                "experience level must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
