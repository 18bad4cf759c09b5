// ABOUTME: Integration tests for the offline fitness model training job
// ABOUTME: Covers reproducibility, holdout accounting, CSV loading, and failure modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use coach_core::errors::ModelError;
use coach_intelligence::{train, train_from_csv, Dataset, TrainingConfig};
use helpers::synthetic_data::{gym_csv, gym_dataset};
use std::fs;

#[test]
fn test_fixed_seed_reproduces_parameters() {
    let dataset = gym_dataset(200, 42);
    let config = TrainingConfig::default();

    let first = train(&dataset, &config).unwrap();
    let second = train(&dataset, &config).unwrap();

    assert_eq!(first.model.scaler(), second.model.scaler());
    assert_eq!(first.model.classifier(), second.model.classifier());
    assert_eq!(first.report.fingerprint, second.report.fingerprint);
    assert_eq!(first.report.holdout_accuracy, second.report.holdout_accuracy);
}

#[test]
fn test_seed_changes_split_and_fingerprint() {
    let dataset = gym_dataset(200, 42);
    let a = train(&dataset, &TrainingConfig::default()).unwrap();
    let b = train(&dataset, &TrainingConfig::default().with_seed(7)).unwrap();

    assert_ne!(a.report.fingerprint, b.report.fingerprint);
    assert_ne!(a.model.scaler(), b.model.scaler());
}

#[test]
fn test_holdout_is_twenty_percent_rounded_up() {
    let dataset = gym_dataset(101, 3);
    let outcome = train(&dataset, &TrainingConfig::default()).unwrap();

    assert_eq!(outcome.report.total_rows, 101);
    assert_eq!(outcome.report.test_rows, 21);
    assert_eq!(outcome.report.train_rows, 80);
    assert_eq!(outcome.model.metadata().test_rows, 21);
}

#[test]
fn test_learns_expert_signal() {
    let dataset = gym_dataset(400, 11);
    let outcome = train(&dataset, &TrainingConfig::default()).unwrap();

    let accuracy = outcome.report.holdout_accuracy.unwrap();
    assert!(accuracy > 0.8, "holdout accuracy {accuracy} too low");
    assert!((0.0..=1.0).contains(&accuracy));
    assert!(outcome.report.fit.final_loss.is_finite());
}

#[test]
fn test_no_holdout_reports_no_accuracy() {
    let dataset = gym_dataset(60, 5);
    let outcome = train(&dataset, &TrainingConfig::default().with_test_fraction(0.0)).unwrap();

    assert_eq!(outcome.report.test_rows, 0);
    assert!(outcome.report.holdout_accuracy.is_none());
}

#[test]
fn test_csv_and_memory_training_agree() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("gym_members.csv");
    fs::write(&csv_path, gym_csv(150, 9)).unwrap();

    let out_dir = dir.path().join("models");
    let from_csv = train_from_csv(&csv_path, &out_dir, &TrainingConfig::default()).unwrap();
    let in_memory = train(&gym_dataset(150, 9), &TrainingConfig::default()).unwrap();

    assert_eq!(from_csv.report.fingerprint, in_memory.report.fingerprint);
    assert_eq!(from_csv.model.classifier(), in_memory.model.classifier());
    assert!(out_dir.join("scaler.json").exists());
    assert!(out_dir.join("fitness_model.json").exists());
}

#[test]
fn test_single_class_partition_fails() {
    let data = "Age,Weight (kg),Height (m),Resting_BPM,Max_BPM,Workout_Frequency (days/week),BMI,Experience_Level\n\
                30,70,1.7,60,190,3,24.2,1\n\
                31,72,1.8,62,189,3,22.2,2\n\
                32,74,1.6,64,188,2,28.9,1\n\
                33,76,1.75,66,187,4,24.8,2\n";
    let dataset = Dataset::from_reader(data.as_bytes()).unwrap();

    let err = train(&dataset, &TrainingConfig::default()).unwrap_err();
    assert!(matches!(err, ModelError::InsufficientData { .. }));
}

#[test]
fn test_tiny_dataset_fails() {
    let dataset = gym_dataset(1, 1);
    let err = train(&dataset, &TrainingConfig::default()).unwrap_err();
    assert!(matches!(err, ModelError::InsufficientData { .. }));
}

#[test]
fn test_failed_run_leaves_existing_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("models");
    let good_csv = dir.path().join("good.csv");
    fs::write(&good_csv, gym_csv(120, 2)).unwrap();
    train_from_csv(&good_csv, &out_dir, &TrainingConfig::default()).unwrap();
    let before = fs::read_to_string(out_dir.join("fitness_model.json")).unwrap();

    let bad_csv = dir.path().join("bad.csv");
    fs::write(
        &bad_csv,
        "Age,Weight (kg),Height (m),Resting_BPM,Max_BPM,Workout_Frequency (days/week),BMI,Experience_Level\n30,70,1.7,60,190,3,24.2,9\n",
    )
    .unwrap();
    let err = train_from_csv(&bad_csv, &out_dir, &TrainingConfig::default()).unwrap_err();
    assert!(matches!(err, ModelError::Dataset { row: Some(1), .. }));

    let after = fs::read_to_string(out_dir.join("fitness_model.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_missing_dataset_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = train_from_csv(
        &dir.path().join("absent.csv"),
        dir.path(),
        &TrainingConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DatasetIo { .. }));
}
