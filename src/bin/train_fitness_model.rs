// ABOUTME: Offline training job for the fitness-score model
// ABOUTME: Fits the standardizer and classifier on a gym-member CSV and writes both artifacts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Fitness model trainer.
//!
//! Usage:
//! ```bash
//! # Train on the default dataset and write models/scaler.json + models/fitness_model.json
//! cargo run --bin train-fitness-model -- --dataset data/gym_members_exercise_tracking.csv
//!
//! # Reproducible run with a different seed and stronger regularization
//! cargo run --bin train-fitness-model -- --dataset gym.csv --seed 7 --c 0.5
//!
//! # Fit on every row (no holdout accuracy is reported)
//! cargo run --bin train-fitness-model -- --dataset gym.csv --test-fraction 0
//! ```

use clap::Parser;
use pierre_coach::{
    constants::{service_names, training},
    errors::ModelError,
    intelligence::{train_from_csv, LogisticConfig, TrainingConfig, TrainingReport},
    logging::{AppLogger, LoggingConfig},
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};

/// CLI-specific error type for the trainer
#[derive(Error, Debug)]
enum TrainerError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Parser)]
#[command(
    name = "train-fitness-model",
    about = "Pierre Coach fitness model trainer",
    long_about = "Fit the standardizer and logistic classifier on a gym-member CSV and write the artifacts the server loads"
)]
struct TrainArgs {
    /// Training CSV with Age, Weight (kg), Height (m), Resting_BPM, Max_BPM,
    /// Workout_Frequency (days/week), BMI, and Experience_Level columns
    #[arg(long, default_value = "data/gym_members_exercise_tracking.csv")]
    dataset: PathBuf,

    /// Directory receiving scaler.json and fitness_model.json
    #[arg(long, default_value = "models")]
    output_dir: PathBuf,

    /// Fraction of rows held out for accuracy, in [0, 1)
    #[arg(long, default_value_t = training::DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Shuffle seed
    #[arg(long, default_value_t = training::DEFAULT_SEED)]
    seed: u64,

    /// Inverse regularization strength
    #[arg(long = "c", default_value_t = training::DEFAULT_INVERSE_REGULARIZATION)]
    inverse_regularization: f64,

    /// Gradient descent step size
    #[arg(long, default_value_t = training::DEFAULT_LEARNING_RATE)]
    learning_rate: f64,

    /// Iteration cap
    #[arg(long, default_value_t = training::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Convergence threshold on the largest gradient component
    #[arg(long, default_value_t = training::DEFAULT_TOLERANCE)]
    tolerance: f64,
}

impl TrainArgs {
    const fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            test_fraction: self.test_fraction,
            seed: self.seed,
            logistic: LogisticConfig {
                inverse_regularization: self.inverse_regularization,
                learning_rate: self.learning_rate,
                max_iterations: self.max_iterations,
                tolerance: self.tolerance,
            },
        }
    }
}

fn main() -> ExitCode {
    let args = TrainArgs::parse();

    match run(&args) {
        Ok(report) => {
            print_report(&report, &args);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Training failed; existing artifacts were left untouched");
            eprintln!("training failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &TrainArgs) -> Result<TrainingReport, TrainerError> {
    LoggingConfig::from_env_for(service_names::FITNESS_MODEL_TRAINER)
        .init()
        .map_err(|e| TrainerError::Logging(e.to_string()))?;

    let config = args.training_config();
    info!(
        dataset = %args.dataset.display(),
        output_dir = %args.output_dir.display(),
        ?config,
        "Training fitness model"
    );

    let outcome = train_from_csv(&args.dataset, &args.output_dir, &config)?;
    let report = outcome.report;
    AppLogger::log_training_run(
        &report.fingerprint,
        report.train_rows,
        report.test_rows,
        report.holdout_accuracy,
    );

    Ok(report)
}

fn print_report(report: &TrainingReport, args: &TrainArgs) {
    println!("Fitness model trained");
    println!(
        "  rows:        {} ({} train, {} holdout)",
        report.total_rows, report.train_rows, report.test_rows
    );
    println!("  expert rows: {} in the training split", report.train_expert_rows);
    println!(
        "  fit:         {} iterations, converged={}, loss={:.6}",
        report.fit.iterations, report.fit.converged, report.fit.final_loss
    );
    match report.holdout_accuracy {
        Some(accuracy) => println!("  accuracy:    {:.2}%", accuracy * 100.0),
        None => println!("  accuracy:    n/a (no holdout rows)"),
    }
    println!("  fingerprint: {}", report.fingerprint);
    println!("  artifacts:   {}", args.output_dir.display());
}
