// ABOUTME: Completed-workout log entries and weekly progress statistics
// ABOUTME: Tracks sessions against the weekly target captured during onboarding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutLog {
    /// Log identifier
    pub workout_id: String,
    /// Owner
    pub user_id: String,
    /// What was done ("easy run", "leg day")
    pub activity: String,
    /// Session length, when reported
    pub duration_minutes: Option<u32>,
    /// Completion time
    pub completed_at: DateTime<Utc>,
}

impl WorkoutLog {
    /// Record a workout completed at `completed_at`
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        activity: impl Into<String>,
        duration_minutes: Option<u32>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workout_id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            activity: activity.into(),
            duration_minutes,
            completed_at,
        }
    }
}

/// Progress against the weekly workout target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutStats {
    /// Sessions completed this week
    pub completed: u32,
    /// Weekly target
    pub goal: u32,
    /// Completion percentage, capped at 100
    pub percentage: u32,
    /// Sessions still needed this week
    pub remaining: u32,
}

impl WorkoutStats {
    /// Compute progress; a zero goal reports 0%
    #[must_use]
    pub fn new(completed: u32, goal: u32) -> Self {
        let percentage = if goal == 0 {
            0
        } else {
            (f64::from(completed) / f64::from(goal) * 100.0)
                .round()
                .min(100.0) as u32
        };

        Self {
            completed,
            goal,
            percentage,
            remaining: goal.saturating_sub(completed),
        }
    }
}

/// Midnight UTC on the Monday of the ISO week containing `now`
#[must_use]
pub fn week_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = i64::from(now.weekday().num_days_from_monday());
    let monday = now.date_naive() - Duration::days(days_from_monday);
    monday.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stats_progress() {
        assert_eq!(
            WorkoutStats::new(2, 4),
            WorkoutStats {
                completed: 2,
                goal: 4,
                percentage: 50,
                remaining: 2
            }
        );
        assert_eq!(WorkoutStats::new(1, 3).percentage, 33);
    }

    #[test]
    fn test_stats_overachiever_and_zero_goal() {
        let over = WorkoutStats::new(6, 4);
        assert_eq!(over.percentage, 100);
        assert_eq!(over.remaining, 0);

        let none = WorkoutStats::new(2, 0);
        assert_eq!(none.percentage, 0);
        assert_eq!(none.remaining, 0);
    }

    #[test]
    fn test_week_starts_on_monday_midnight() {
        // Thursday 2025-02-13 17:45 UTC
        let thursday = Utc.with_ymd_and_hms(2025, 2, 13, 17, 45, 0).unwrap();
        assert_eq!(
            week_start(thursday),
            Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap()
        );

        let monday = Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap();
        assert_eq!(week_start(monday), monday);
    }
}
