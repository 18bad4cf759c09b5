// ABOUTME: Integration tests for the SQLite persistence layer
// ABOUTME: Profiles, journals, schedules, and workout logs against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{create_test_database, seed_profile};
use pierre_coach::config::DatabaseUrl;
use pierre_coach::database::Database;
use pierre_coach::models::{
    BiometricInput, ExperienceLevel, NormalizedJournal, ScheduledSession, StoredSchedule,
    UserJournal, WeeklySchedule, WorkoutLog,
};
use serde_json::json;
use tempfile::TempDir;

fn journal(user_id: &str, text: &str) -> UserJournal {
    UserJournal::new(
        user_id,
        text,
        NormalizedJournal {
            cleaned_text: text.to_owned(),
            context_tags: vec!["sleep".to_owned()],
            safety_flag: false,
        },
    )
}

fn plan(focus: &str) -> WeeklySchedule {
    WeeklySchedule {
        sessions: vec![ScheduledSession {
            day: "Monday".to_owned(),
            focus: focus.to_owned(),
            duration_minutes: 30,
            intensity: "low".to_owned(),
            activities: vec!["walk".to_owned()],
        }],
        notes: None,
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_profile_round_trip() {
    let db = create_test_database().await;
    let seeded = seed_profile(&db, "sam").await;

    let stored = db.get_profile("sam").await.unwrap().unwrap();
    assert_eq!(stored.user_id, seeded.user_id);
    assert_eq!(stored.goals, seeded.goals);
    assert_eq!(stored.ai_extracted_data, seeded.ai_extracted_data);
    assert_eq!(stored.workouts_per_week, 4);
    assert_eq!(stored.experience_level, ExperienceLevel::Beginner);

    assert!(db.get_profile("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_replaces_profile() {
    let db = create_test_database().await;
    let mut profile = seed_profile(&db, "sam").await;

    profile.goals = vec!["triathlon".to_owned()];
    profile.workouts_per_week = 6;
    db.upsert_profile(&profile).await.unwrap();

    let stored = db.get_profile("sam").await.unwrap().unwrap();
    assert_eq!(stored.goals, vec!["triathlon".to_owned()]);
    assert_eq!(stored.workouts_per_week, 6);
}

#[tokio::test]
async fn test_biometrics_and_fitness_write_back() {
    let db = create_test_database().await;
    seed_profile(&db, "sam").await;

    let biometrics = db.get_biometrics("sam").await.unwrap().unwrap();
    assert_eq!(biometrics, BiometricInput::new(31.0, 68.5, 172.0, 58.0, 4));

    assert!(db
        .update_fitness_result("sam", 0.71, ExperienceLevel::Intermediate)
        .await
        .unwrap());
    assert!(!db
        .update_fitness_result("ghost", 0.5, ExperienceLevel::Beginner)
        .await
        .unwrap());

    let stored = db.get_profile("sam").await.unwrap().unwrap();
    assert!((stored.fitness_score - 0.71).abs() < 1e-9);
    assert_eq!(stored.experience_level, ExperienceLevel::Intermediate);
}

#[tokio::test]
async fn test_goals_lookup() {
    let db = create_test_database().await;
    seed_profile(&db, "sam").await;

    assert_eq!(
        db.get_goals("sam").await.unwrap(),
        Some(vec!["half marathon".to_owned(), "mobility".to_owned()])
    );
    assert_eq!(db.get_goals("ghost").await.unwrap(), None);
}

// ============================================================================
// Journals
// ============================================================================

#[tokio::test]
async fn test_recent_journals_newest_first_and_limited() {
    let db = create_test_database().await;
    let base = Utc.with_ymd_and_hms(2025, 2, 10, 8, 0, 0).unwrap();

    for day in 0..9 {
        let mut entry = journal("sam", &format!("day {day}"));
        entry.created_at = base + Duration::days(day);
        db.insert_journal(&entry).await.unwrap();
    }
    db.insert_journal(&journal("kai", "other user")).await.unwrap();

    let recent = db.recent_journals("sam", 7).await.unwrap();
    assert_eq!(recent.len(), 7);
    assert_eq!(recent[0].text, "day 8");
    assert_eq!(recent[6].text, "day 2");
    assert!(recent.iter().all(|j| j.user_id == "sam"));
}

#[tokio::test]
async fn test_attach_analysis() {
    let db = create_test_database().await;
    let entry = journal("sam", "slept badly");
    db.insert_journal(&entry).await.unwrap();

    let analysis = json!({ "sentiment": -0.4, "observation": "Prioritize rest." });
    assert!(db
        .attach_journal_analysis(&entry.journal_id, -0.4, &analysis)
        .await
        .unwrap());
    assert!(!db
        .attach_journal_analysis("jrnl_missing", 0.0, &analysis)
        .await
        .unwrap());

    let stored = db.recent_journals("sam", 1).await.unwrap().remove(0);
    assert_eq!(stored.sentiment_score, Some(-0.4));
    assert_eq!(stored.analysis_results, analysis);
    assert_eq!(stored.context_tags, vec!["sleep".to_owned()]);
}

// ============================================================================
// Schedules and Workouts
// ============================================================================

#[tokio::test]
async fn test_latest_schedule_wins() {
    let db = create_test_database().await;
    assert!(db.latest_schedule("sam").await.unwrap().is_none());

    for focus in ["base", "build"] {
        db.save_schedule(&StoredSchedule {
            user_id: "sam".to_owned(),
            schedule: plan(focus),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    let latest = db.latest_schedule("sam").await.unwrap().unwrap();
    assert_eq!(latest.schedule.sessions[0].focus, "build");
}

#[tokio::test]
async fn test_count_workouts_since() {
    let db = create_test_database().await;
    let monday = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();

    for (activity, at) in [
        ("last sunday", monday - Duration::hours(2)),
        ("monday run", monday + Duration::hours(7)),
        ("wednesday lift", monday + Duration::days(2)),
    ] {
        db.log_workout(&WorkoutLog::new("sam", activity, Some(30), at))
            .await
            .unwrap();
    }

    assert_eq!(db.count_workouts_since("sam", monday).await.unwrap(), 2);
    assert_eq!(db.count_workouts_since("kai", monday).await.unwrap(), 0);
}

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn test_file_database_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("coach.db");
    let url = DatabaseUrl::parse_url(&format!("sqlite:{}", path.display())).unwrap();

    let db = Database::new(&url).await.unwrap();
    db.ping().await.unwrap();
    seed_profile(&db, "sam").await;

    assert!(path.exists());
}
