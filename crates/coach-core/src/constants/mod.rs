// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for scoring, training, services, and environment defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! This module organizes application constants by domain for better maintainability.

/// Service identity used in structured logs and health responses
pub mod service_names {
    /// Main HTTP server
    pub const PIERRE_COACH_SERVER: &str = "pierre-coach-server";
    /// Offline training job
    pub const FITNESS_MODEL_TRAINER: &str = "train-fitness-model";
}

/// Physiological formulas used by the feature engineer
pub mod physiology {
    /// Fox formula base: estimated max heart rate = 220 - age
    pub const FOX_MAX_HR_BASE: f64 = 220.0;
    /// Centimetres per metre
    pub const CM_PER_METRE: f64 = 100.0;
}

/// Fitness model feature contract and artifact format
pub mod fitness_model {
    /// Number of features the classifier consumes
    pub const FEATURE_COUNT: usize = 7;

    /// Feature order shared by training and inference. Never reorder.
    pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
        "age",
        "weight_kg",
        "height_m",
        "resting_bpm",
        "max_bpm",
        "workouts_per_week",
        "bmi",
    ];

    /// Version of the JSON artifact layout; bump on any incompatible change
    pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

    /// Default scaler artifact file name
    pub const SCALER_FILE_NAME: &str = "scaler.json";
    /// Default classifier artifact file name
    pub const CLASSIFIER_FILE_NAME: &str = "fitness_model.json";

    /// Decimal places kept on the published fitness score
    pub const SCORE_DECIMALS: i32 = 2;

    /// Experience level that becomes the positive (expert) class
    pub const EXPERT_LEVEL: u8 = 3;
}

/// Offline training defaults
pub mod training {
    /// Fraction of rows held out for evaluation
    pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
    /// Seed for the holdout shuffle
    pub const DEFAULT_SEED: u64 = 42;
    /// Inverse L2 regularization strength
    pub const DEFAULT_INVERSE_REGULARIZATION: f64 = 1.0;
    /// Gradient descent step size on standardized features
    pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
    /// Upper bound on gradient descent iterations
    pub const DEFAULT_MAX_ITERATIONS: usize = 5_000;
    /// Stop when every gradient component falls below this magnitude
    pub const DEFAULT_TOLERANCE: f64 = 1e-8;
    /// Minimum rows required in the training partition
    pub const MIN_TRAINING_ROWS: usize = 2;

    /// Dataset column headers
    pub mod columns {
        /// Age in years
        pub const AGE: &str = "Age";
        /// Body weight
        pub const WEIGHT_KG: &str = "Weight (kg)";
        /// Height in metres
        pub const HEIGHT_M: &str = "Height (m)";
        /// Resting heart rate
        pub const RESTING_BPM: &str = "Resting_BPM";
        /// Maximum heart rate
        pub const MAX_BPM: &str = "Max_BPM";
        /// Weekly workout sessions
        pub const WORKOUT_FREQUENCY: &str = "Workout_Frequency (days/week)";
        /// Body-mass index
        pub const BMI: &str = "BMI";
        /// Label column (1 beginner, 2 intermediate, 3 expert)
        pub const EXPERIENCE_LEVEL: &str = "Experience_Level";
    }
}

/// Onboarding and journaling defaults
pub mod coaching {
    /// Interests used when a user has no stored goals
    pub const DEFAULT_INTERESTS: &str = "General wellness";
    /// Default daily calorie target recorded at onboarding
    pub const DEFAULT_TARGET_CALORIES: i64 = 2000;
    /// Broad goal used when the client does not send one
    pub const DEFAULT_BROAD_GOAL: &str = "general_fitness";
    /// Prefix for generated journal identifiers
    pub const JOURNAL_ID_PREFIX: &str = "jrnl_";
    /// Message returned while waiting for the user to speak
    pub const AWAITING_INPUT_MESSAGE: &str = "Waiting for your input...";
    /// Message returned when the conversation is done but body metrics are missing
    pub const NEEDS_METRICS_MESSAGE: &str =
        "Almost there! Please share a few body metrics to finish your profile.";
    /// Message returned with a completed profile
    pub const PROFILE_COMPLETE_MESSAGE: &str = "Your profile is ready.";
    /// Body metrics the metrics form collects when the conversation did not
    pub const BODY_METRICS: [&str; 4] = ["age", "weight_kg", "height_cm", "resting_bpm"];
    /// Entries returned by the journal history endpoint
    pub const JOURNAL_HISTORY_LIMIT: u32 = 7;
}

/// Default values for environment configuration
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Default database location
    pub const DATABASE_URL: &str = "sqlite:./data/pierre_coach.db";
    /// Default scaler artifact path
    pub const SCALER_PATH: &str = "models/scaler.json";
    /// Default classifier artifact path
    pub const CLASSIFIER_PATH: &str = "models/fitness_model.json";
    /// Default generative model
    pub const LLM_MODEL: &str = "gemini-2.5-flash";
    /// Onboarding clerk temperature (near-deterministic extraction)
    pub const ONBOARDING_TEMPERATURE: f32 = 0.1;
    /// Journal and schedule temperature
    pub const JOURNAL_TEMPERATURE: f32 = 0.7;
    /// Allowed browser origins for the web client
    pub const CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
    /// Outbound LLM request timeout
    pub const LLM_TIMEOUT_SECS: u64 = 60;
}

/// Environment variable names
pub mod env_vars {
    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Database URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Scaler artifact path
    pub const FITNESS_SCALER_PATH: &str = "FITNESS_SCALER_PATH";
    /// Classifier artifact path
    pub const FITNESS_MODEL_PATH: &str = "FITNESS_MODEL_PATH";
    /// Gemini API key
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Generative model override
    pub const LLM_MODEL: &str = "LLM_MODEL";
    /// Sentiment backend selection
    pub const SENTIMENT_BACKEND: &str = "SENTIMENT_BACKEND";
    /// Comma-separated CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const RUST_LOG: &str = "RUST_LOG";
}
