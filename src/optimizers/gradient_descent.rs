//! Full-batch gradient descent
//!
//! Applies `w = w - η * ∇L/∂w` once per iteration with a fixed step η.
//! Slower than conjugate gradient but easy to reason about, which makes it a
//! useful reference when checking that the objective is wired correctly.

use tracing::{debug, info};

use crate::error::{NetworkError, Result};
use crate::optimizers::{
    check_dimension, inf_norm, DifferentiableObjective, OptimizationResult, Optimizer,
};

/// Fixed-step steepest descent.
///
/// # Example
///
/// ```ignore
/// use digit_nn::optimizers::{GradientDescent, Optimizer};
///
/// let mut optimizer = GradientDescent::new(0.5, 200, 1e-6);
/// let result = optimizer.minimize(&objective, initial)?;
/// ```
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    max_iterations: usize,
    gradient_tolerance: f64,
}

impl GradientDescent {
    /// # Typical Values
    ///
    /// With the loss averaged over examples, steps between 0.1 and 2.0 work
    /// for the sigmoid network; larger values may oscillate.
    pub fn new(learning_rate: f64, max_iterations: usize, gradient_tolerance: f64) -> Self {
        Self {
            learning_rate,
            max_iterations,
            gradient_tolerance,
        }
    }
}

impl Optimizer for GradientDescent {
    fn minimize(
        &mut self,
        objective: &dyn DifferentiableObjective,
        initial: Vec<f64>,
    ) -> Result<OptimizationResult> {
        check_dimension(objective, &initial)?;

        let mut params = initial;
        let (mut loss, mut grad) = objective.evaluate(&params)?;
        let mut evaluations = 1usize;
        let mut iterations = 0usize;
        let mut converged = false;

        info!(
            parameters = params.len(),
            learning_rate = self.learning_rate,
            max_iterations = self.max_iterations,
            initial_loss = loss,
            "starting gradient descent"
        );

        while iterations < self.max_iterations {
            if inf_norm(&grad) <= self.gradient_tolerance {
                converged = true;
                break;
            }

            for (param, g) in params.iter_mut().zip(grad.iter()) {
                *param -= self.learning_rate * g;
            }
            (loss, grad) = objective.evaluate(&params)?;
            evaluations += 1;
            iterations += 1;

            if !loss.is_finite() {
                return Err(NetworkError::InvalidData(format!(
                    "gradient descent diverged at iteration {} (learning rate {})",
                    iterations, self.learning_rate
                )));
            }

            debug!(
                iteration = iterations,
                loss,
                grad_norm = inf_norm(&grad),
                "gradient descent iteration"
            );
        }

        if !converged && inf_norm(&grad) <= self.gradient_tolerance {
            converged = true;
        }

        info!(iterations, loss, converged, "gradient descent finished");

        Ok(OptimizationResult {
            params,
            loss,
            iterations,
            evaluations,
            converged,
        })
    }

    fn name(&self) -> &'static str {
        "gradient_descent"
    }
}
