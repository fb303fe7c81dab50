//! Configuration structures for training
//!
//! This module provides the hyperparameters of a training run (hidden layer
//! width, regularization strength, optimizer and its iteration budget, seed)
//! together with the preprocessing options of the data pipeline.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::data::PreprocessOptions;
use crate::error::{NetworkError, Result};

/// Which optimizer drives the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind {
    #[default]
    ConjugateGradient,
    GradientDescent,
}

/// Configuration for a training run.
///
/// Every field has a default, so a config file only needs the values it
/// changes. Unknown fields are rejected.
///
/// # Example
///
/// ```json
/// {
///   "n_hidden": 50,
///   "lambda": 50.0,
///   "max_iterations": 50,
///   "optimizer": "conjugate_gradient",
///   "seed": 1
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Hidden units, bias unit excluded.
    pub n_hidden: usize,

    /// Number of output classes.
    pub n_class: usize,

    /// L2 regularization strength.
    pub lambda: f64,

    /// Optimizer iteration budget.
    pub max_iterations: usize,

    pub optimizer: OptimizerKind,

    /// Step size, only read by gradient descent.
    pub learning_rate: f64,

    /// Stop early once every gradient entry is within this of zero.
    pub gradient_tolerance: f64,

    /// Seed for weight initialization, 1 unless set; an explicit `null` seeds from the clock.
    pub seed: Option<u64>,

    /// Share of the (deduplicated) training rows held out for validation.
    pub validation_fraction: f64,

    /// Remove exact duplicate training rows before splitting.
    pub deduplicate: bool,

    /// Remove pixels that never vary across the training set.
    pub drop_constant_features: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_hidden: 50,
            n_class: 10,
            lambda: 50.0,
            max_iterations: 50,
            optimizer: OptimizerKind::ConjugateGradient,
            learning_rate: 0.5,
            gradient_tolerance: 1e-5,
            seed: Some(1),
            validation_fraction: 0.2,
            deduplicate: true,
            drop_constant_features: false,
        }
    }
}

impl TrainingConfig {
    /// Check every field for values that would make training meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.n_hidden == 0 {
            return Err(invalid("n_hidden must be positive"));
        }
        if self.n_class < 2 {
            return Err(invalid("n_class must be at least 2"));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(invalid("lambda must be finite and non-negative"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be positive"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(invalid("learning_rate must be positive"));
        }
        if !self.gradient_tolerance.is_finite() || self.gradient_tolerance < 0.0 {
            return Err(invalid("gradient_tolerance must be non-negative"));
        }
        if !(0.0..1.0).contains(&self.validation_fraction) {
            return Err(invalid("validation_fraction must be in [0, 1)"));
        }
        Ok(())
    }

    /// Data pipeline options carried by this config.
    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            deduplicate: self.deduplicate,
            validation_fraction: self.validation_fraction,
            drop_constant_features: self.drop_constant_features,
        }
    }
}

fn invalid(message: &str) -> NetworkError {
    NetworkError::InvalidConfig(message.to_string())
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `TrainingConfig` and
/// validates it.
///
/// # Examples
///
/// ```no_run
/// use digit_nn::config::load_config;
///
/// let cfg = load_config("config/mnist_nn.json").unwrap();
/// assert_eq!(cfg.n_hidden, 50);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
