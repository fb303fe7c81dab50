//! Training driver
//!
//! Wires the pieces together: random initial weights, flattening, the
//! optimizer run against the objective, and accuracy on every split.

use tracing::info;

use crate::config::{OptimizerKind, TrainingConfig};
use crate::data::{Dataset, Splits};
use crate::error::Result;
use crate::network::{accuracy, predict, NetworkShape, ObjectiveFunction, Weights};
use crate::optimizers::{ConjugateGradient, GradientDescent, OptimizationResult, Optimizer};
use crate::utils::{Matrix, SimpleRng};

/// Weights after optimization together with how the optimizer got there.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub weights: Weights,
    pub optimization: OptimizationResult,
}

impl TrainedModel {
    /// Predicted 1-indexed classes for the rows of `data`.
    pub fn predict(&self, data: &Matrix) -> Result<Vec<usize>> {
        predict(&self.weights.w1, &self.weights.w2, data)
    }

    /// Percentage of rows of `dataset` classified correctly.
    pub fn accuracy(&self, dataset: &Dataset) -> Result<f64> {
        accuracy(&self.predict(&dataset.features)?, &dataset.labels)
    }
}

/// Accuracy, in percent, on each split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyReport {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

/// Optimizer described by `config`.
pub fn build_optimizer(config: &TrainingConfig) -> Box<dyn Optimizer> {
    match config.optimizer {
        OptimizerKind::ConjugateGradient => Box::new(ConjugateGradient::new(
            config.max_iterations,
            config.gradient_tolerance,
        )),
        OptimizerKind::GradientDescent => Box::new(GradientDescent::new(
            config.learning_rate,
            config.max_iterations,
            config.gradient_tolerance,
        )),
    }
}

/// Fit a network of the given shape to `train`.
///
/// Initial weights come from `rng`; everything after that is deterministic.
pub fn train(
    shape: NetworkShape,
    train: &Dataset,
    lambda: f64,
    optimizer: &mut dyn Optimizer,
    rng: &mut SimpleRng,
) -> Result<TrainedModel> {
    let objective = ObjectiveFunction::new(shape, &train.features, &train.labels, lambda)?;
    let initial = Weights::initialize(shape, rng).flatten();

    info!(
        n_input = shape.n_input,
        n_hidden = shape.n_hidden,
        n_class = shape.n_class,
        parameters = shape.parameter_count(),
        examples = train.len(),
        lambda,
        optimizer = optimizer.name(),
        "training network"
    );

    let optimization = optimizer.minimize(&objective, initial)?;
    let weights = Weights::from_flat(shape, &optimization.params)?;

    Ok(TrainedModel {
        weights,
        optimization,
    })
}

/// Accuracy of `model` on the train, validation and test splits.
pub fn evaluate(model: &TrainedModel, splits: &Splits) -> Result<AccuracyReport> {
    Ok(AccuracyReport {
        train: model.accuracy(&splits.train)?,
        validation: model.accuracy(&splits.validation)?,
        test: model.accuracy(&splits.test)?,
    })
}

/// Train on `splits.train` with the hyperparameters in `config` and evaluate.
pub fn run(
    config: &TrainingConfig,
    splits: &Splits,
    rng: &mut SimpleRng,
) -> Result<(TrainedModel, AccuracyReport)> {
    config.validate()?;
    let shape = NetworkShape::new(splits.n_input, config.n_hidden, config.n_class)?;
    let mut optimizer = build_optimizer(config);
    let model = train(shape, &splits.train, config.lambda, optimizer.as_mut(), rng)?;
    let report = evaluate(&model, splits)?;
    Ok((model, report))
}
