//! Full-batch optimizers driving the network objective
//!
//! This module defines the contract between the network and an iterative
//! numerical optimizer. The network side only has to expose a pure function
//! from a flat parameter vector to `(loss, gradient)`; the optimizer owns the
//! parameter vector, decides where to evaluate next and when to stop.
//!
//! # Available Optimizers
//!
//! - `ConjugateGradient`: nonlinear Polak-Ribière conjugate gradient with a
//!   backtracking line search (the default)
//! - `GradientDescent`: fixed-step steepest descent
//!
//! # Example
//!
//! ```ignore
//! use digit_nn::optimizers::{ConjugateGradient, Optimizer};
//!
//! let mut optimizer = ConjugateGradient::new(50, 1e-5);
//! let result = optimizer.minimize(&objective, initial_params)?;
//! println!("final loss {}", result.loss);
//! ```

pub mod conjugate_gradient;
pub mod gradient_descent;

pub use conjugate_gradient::ConjugateGradient;
pub use gradient_descent::GradientDescent;

use crate::error::{NetworkError, Result};

/// A scalar function with an analytic gradient.
///
/// `evaluate` must not depend on any state mutated by earlier calls, so the
/// same objective can be evaluated at unrelated points in any order.
pub trait DifferentiableObjective {
    /// Length of the parameter vector.
    fn dimension(&self) -> usize;

    /// Loss and gradient at `params`. The gradient has the same layout as `params`.
    fn evaluate(&self, params: &[f64]) -> Result<(f64, Vec<f64>)>;
}

/// Outcome of a minimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best parameters found.
    pub params: Vec<f64>,
    /// Objective value at `params`.
    pub loss: f64,
    /// Completed iterations.
    pub iterations: usize,
    /// Objective evaluations, line-search trials included.
    pub evaluations: usize,
    /// Whether the gradient tolerance was met before the iteration budget ran out.
    pub converged: bool,
}

/// Core trait for full-batch optimizers.
///
/// Running out of iterations is not an error: the best point so far is
/// returned with `converged == false`.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial`.
    fn minimize(
        &mut self,
        objective: &dyn DifferentiableObjective,
        initial: Vec<f64>,
    ) -> Result<OptimizationResult>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
}

pub(crate) fn check_dimension(
    objective: &dyn DifferentiableObjective,
    initial: &[f64],
) -> Result<()> {
    if initial.len() != objective.dimension() {
        return Err(NetworkError::ParameterLength {
            expected: objective.dimension(),
            actual: initial.len(),
        });
    }
    Ok(())
}
