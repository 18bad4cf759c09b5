// ABOUTME: Weekly training schedule models produced by the schedule planner prompt
// ABOUTME: Defines sessions, the weekly plan, and the persisted schedule record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One planned training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    /// Day of the week
    pub day: String,
    /// Session focus (e.g. "tempo run", "upper body strength")
    pub focus: String,
    /// Planned duration
    #[serde(default, deserialize_with = "minutes")]
    pub duration_minutes: u32,
    /// Intensity label (low, moderate, high)
    #[serde(default)]
    pub intensity: String,
    /// Concrete activities
    #[serde(default)]
    pub activities: Vec<String>,
}

/// A generated training week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// Sessions in day order
    pub sessions: Vec<ScheduledSession>,
    /// Coaching notes for the week
    #[serde(default)]
    pub notes: Option<String>,
}

impl WeeklySchedule {
    /// Total planned minutes for the week
    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.sessions.iter().map(|s| s.duration_minutes).sum()
    }
}

/// Persisted schedule record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSchedule {
    /// Owner
    pub user_id: String,
    /// The plan
    pub schedule: WeeklySchedule,
    /// Generation time
    pub created_at: DateTime<Utc>,
}

fn minutes<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient::f64_opt(deserializer)?;
    Ok(value.filter(|m| *m > 0.0).map_or(0, |m| m.round() as u32))
}
