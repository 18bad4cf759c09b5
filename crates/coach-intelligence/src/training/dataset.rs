// ABOUTME: Labeled gym-member dataset loader for offline fitness model training
// ABOUTME: Parses CSV with named headers, validates values, and reports row-level errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::features::FeatureVector;
use coach_core::constants::training::columns;
use coach_core::errors::ModelError;
use coach_core::models::ExperienceLevel;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const REQUIRED_COLUMNS: [&str; 8] = [
    columns::AGE,
    columns::WEIGHT_KG,
    columns::HEIGHT_M,
    columns::RESTING_BPM,
    columns::MAX_BPM,
    columns::WORKOUT_FREQUENCY,
    columns::BMI,
    columns::EXPERIENCE_LEVEL,
];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Age")]
    age: f64,
    #[serde(rename = "Weight (kg)")]
    weight_kg: f64,
    #[serde(rename = "Height (m)")]
    height_m: f64,
    #[serde(rename = "Resting_BPM")]
    resting_bpm: f64,
    #[serde(rename = "Max_BPM")]
    max_bpm: f64,
    #[serde(rename = "Workout_Frequency (days/week)")]
    workout_frequency: f64,
    #[serde(rename = "BMI")]
    bmi: f64,
    #[serde(rename = "Experience_Level")]
    experience_level: f64,
}

/// One labeled training example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledExample {
    /// Features in canonical order
    pub features: FeatureVector,
    /// Experience level label (1, 2 or 3)
    pub level: u8,
}

impl LabeledExample {
    /// Binary training target: expert or not
    #[must_use]
    pub const fn is_expert(&self) -> bool {
        ExperienceLevel::is_expert_label(self.level)
    }
}

/// Labeled dataset in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
}

impl Dataset {
    /// Build a dataset from examples already in memory
    #[must_use]
    pub const fn from_examples(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    /// Load a CSV file.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DatasetIo` if the file cannot be opened, or
    /// `ModelError::Dataset` for missing columns and malformed rows.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|source| ModelError::DatasetIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse CSV from any reader. Columns beyond the required ones are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Dataset` for missing columns, unparseable or
    /// non-finite values, and labels outside 1..=3. Row numbers are 1-based
    /// and count data rows only.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv
            .headers()
            .map_err(|e| ModelError::dataset(format!("cannot read header row: {e}")))?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::dataset(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut examples = Vec::new();
        for (index, record) in csv.deserialize::<CsvRow>().enumerate() {
            let row_number = index + 1;
            let row = record.map_err(|e| ModelError::dataset_row(row_number, e.to_string()))?;
            examples.push(row.into_example(row_number)?);
        }

        Ok(Self { examples })
    }

    /// Examples in file order
    #[must_use]
    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Count of rows with the expert label
    #[must_use]
    pub fn expert_count(&self) -> usize {
        self.examples.iter().filter(|e| e.is_expert()).count()
    }
}

impl CsvRow {
    fn into_example(self, row_number: usize) -> Result<LabeledExample, ModelError> {
        let features = FeatureVector::from_array([
            self.age,
            self.weight_kg,
            self.height_m,
            self.resting_bpm,
            self.max_bpm,
            self.workout_frequency,
            self.bmi,
        ]);
        if !features.is_finite() {
            return Err(ModelError::dataset_row(
                row_number,
                "feature values must be finite numbers",
            ));
        }

        let level = self.experience_level;
        if level.fract().abs() > f64::EPSILON || !(1.0..=3.0).contains(&level) {
            return Err(ModelError::dataset_row(
                row_number,
                format!("{} must be 1, 2 or 3, got {level}", columns::EXPERIENCE_LEVEL),
            ));
        }

        Ok(LabeledExample {
            features,
            level: level as u8,
        })
    }
}
