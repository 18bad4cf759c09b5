// ABOUTME: Binary logistic classifier with L2 regularization fitted by full-batch gradient descent
// ABOUTME: Penalized gradient over an aprender matrix, stepped by aprender's SGD optimizer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::features::feature_matrix;
use aprender::optim::SGD;
use aprender::primitives::{Matrix, Vector};
use coach_core::constants::fitness_model::FEATURE_COUNT;
use coach_core::constants::training::{
    DEFAULT_INVERSE_REGULARIZATION, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};
use coach_core::errors::ModelError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hyper-parameters for fitting the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Inverse regularization strength (larger means weaker L2 penalty)
    pub inverse_regularization: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Iteration cap
    pub max_iterations: usize,
    /// Convergence threshold on the largest gradient component
    pub tolerance: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            inverse_regularization: DEFAULT_INVERSE_REGULARIZATION,
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LogisticConfig {
    /// Check that every hyper-parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Training` naming the offending parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.inverse_regularization.is_finite() && self.inverse_regularization > 0.0) {
            return Err(ModelError::training(
                "inverse regularization must be finite and positive",
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ModelError::training(
                "learning rate must be finite and positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(ModelError::training("max iterations must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ModelError::training("tolerance must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Outcome of gradient descent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    /// Iterations actually run
    pub iterations: usize,
    /// Whether the tolerance was reached before the cap
    pub converged: bool,
    /// Final regularized mean log-loss on the training rows
    pub final_loss: f64,
}

/// Fitted binary logistic classifier over standardized features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticClassifier {
    /// Fit on standardized rows and binary labels (`true` = expert).
    ///
    /// Minimizes `mean(log_loss) + ||w||^2 / (2 * C * n)`, the per-sample form
    /// of `C * sum(log_loss) + ||w||^2 / 2`. The intercept is not penalized.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InsufficientData` for empty or single-class input,
    /// and `ModelError::Training` on invalid hyper-parameters or divergence.
    pub fn fit(
        rows: &[[f64; FEATURE_COUNT]],
        labels: &[bool],
        config: &LogisticConfig,
    ) -> Result<(Self, FitDiagnostics), ModelError> {
        config.validate()?;

        if rows.len() != labels.len() {
            return Err(ModelError::training(format!(
                "{} feature rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if rows.is_empty() {
            return Err(ModelError::insufficient("cannot fit classifier on zero rows"));
        }
        let positives = labels.iter().filter(|l| **l).count();
        if positives == 0 || positives == labels.len() {
            return Err(ModelError::insufficient(format!(
                "training partition contains a single class ({positives} of {} rows are expert)",
                labels.len()
            )));
        }

        let x = feature_matrix(rows.iter())?;
        let targets: Vec<f64> = labels.iter().map(|&y| f64::from(u8::from(y))).collect();
        let penalty = 1.0 / (config.inverse_regularization * rows.len() as f64);

        // Weights in feature order, intercept last
        let mut params: Vector<f32> = Vector::zeros(FEATURE_COUNT + 1);
        let mut optimizer = SGD::new(config.learning_rate as f32);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < config.max_iterations {
            iterations += 1;

            let gradient = penalized_gradient(&x, &targets, &params, penalty);
            optimizer.step(&mut params, &gradient);

            if !params.as_slice().iter().all(|p| p.is_finite()) {
                return Err(ModelError::training(format!(
                    "parameters diverged after {iterations} iterations; lower the learning rate"
                )));
            }

            let max_grad = gradient
                .as_slice()
                .iter()
                .fold(0.0_f64, |acc, g| acc.max(f64::from(g.abs())));
            if max_grad < config.tolerance {
                converged = true;
                break;
            }
        }

        let model = Self::from_params(params.as_slice())?;
        let final_loss = model.loss(rows, labels, penalty);
        debug!(iterations, converged, final_loss, "logistic regression fit finished");

        Ok((
            model,
            FitDiagnostics {
                iterations,
                converged,
                final_loss,
            },
        ))
    }

    fn from_params(params: &[f32]) -> Result<Self, ModelError> {
        let (intercept, weights) = params
            .split_last()
            .ok_or_else(|| ModelError::training("optimizer returned no parameters"))?;
        let weights: Vec<f64> = weights.iter().map(|w| f64::from(*w)).collect();
        Self::from_parts(&weights, f64::from(*intercept))
    }

    /// Rebuild a classifier from persisted parameters.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Incompatible` on wrong dimensions or non-finite values.
    pub fn from_parts(weights: &[f64], intercept: f64) -> Result<Self, ModelError> {
        let weights: [f64; FEATURE_COUNT] = weights.try_into().map_err(|_| {
            ModelError::incompatible(format!(
                "classifier has {} weights, expected {FEATURE_COUNT}",
                weights.len()
            ))
        })?;
        let model = Self { weights, intercept };
        if !model.is_finite() {
            return Err(ModelError::incompatible(
                "classifier parameters contain non-finite values",
            ));
        }
        Ok(model)
    }

    /// Linear decision value `w . x + b`
    #[must_use]
    pub fn decision(&self, standardized: &[f64; FEATURE_COUNT]) -> f64 {
        self.weights
            .iter()
            .zip(standardized)
            .fold(self.intercept, |acc, (w, x)| w.mul_add(*x, acc))
    }

    /// Probability of the expert class
    #[must_use]
    pub fn predict_proba(&self, standardized: &[f64; FEATURE_COUNT]) -> f64 {
        sigmoid(self.decision(standardized))
    }

    /// Hard prediction: expert iff the decision value is positive
    #[must_use]
    pub fn predict(&self, standardized: &[f64; FEATURE_COUNT]) -> bool {
        self.decision(standardized) > 0.0
    }

    /// Fitted weights in feature order
    #[must_use]
    pub const fn weights(&self) -> &[f64; FEATURE_COUNT] {
        &self.weights
    }

    /// Fitted intercept
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }

    fn loss(&self, rows: &[[f64; FEATURE_COUNT]], labels: &[bool], penalty: f64) -> f64 {
        let n = rows.len() as f64;
        let data_loss: f64 = rows
            .iter()
            .zip(labels)
            .map(|(x, &y)| {
                let z = self.decision(x);
                // log(1 + e^z) - y*z, computed without overflow
                let softplus = z.max(0.0) + (-z.abs()).exp().ln_1p();
                if y {
                    softplus - z
                } else {
                    softplus
                }
            })
            .sum();
        let l2: f64 = self.weights.iter().map(|w| w * w).sum();
        data_loss / n + 0.5 * penalty * l2
    }
}

/// Gradient of `mean(log_loss) + penalty * ||w||^2 / 2` at `params`.
///
/// Accumulates in `f64` in row order; the intercept is not penalized.
fn penalized_gradient(
    x: &Matrix<f32>,
    targets: &[f64],
    params: &Vector<f32>,
    penalty: f64,
) -> Vector<f32> {
    let params: Vec<f64> = params.as_slice().iter().map(|p| f64::from(*p)).collect();
    let weights = &params[..FEATURE_COUNT];
    let intercept = params[FEATURE_COUNT];
    let mut grad = [0.0_f64; FEATURE_COUNT + 1];

    for (row, y) in targets.iter().enumerate() {
        let z = weights.iter().enumerate().fold(intercept, |acc, (col, w)| {
            w.mul_add(f64::from(x.get(row, col)), acc)
        });
        let error = sigmoid(z) - y;
        for (col, g) in grad[..FEATURE_COUNT].iter_mut().enumerate() {
            *g = error.mul_add(f64::from(x.get(row, col)), *g);
        }
        grad[FEATURE_COUNT] += error;
    }

    let n = targets.len() as f64;
    let gradient = grad
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let shrink = weights.get(i).map_or(0.0, |w| penalty * w);
            (g / n + shrink) as f32
        })
        .collect();
    Vector::from_vec(gradient)
}

/// Logistic function evaluated without overflow for large `|z|`
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
