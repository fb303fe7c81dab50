//! Nonlinear conjugate gradient
//!
//! Polak-Ribière+ directions with a line search that backtracks by quadratic
//! interpolation until the Armijo condition holds, and extrapolates while the
//! curvature condition is still violated. The first trial step of every line
//! search follows the usual heuristic of expecting the same decrease as the
//! previous iteration.
//!
//! Whenever the search direction stops being a descent direction, or a line
//! search along it fails, the method restarts from steepest descent.

use tracing::{debug, info, warn};

use crate::error::{NetworkError, Result};
use crate::optimizers::{
    check_dimension, dot, inf_norm, DifferentiableObjective, OptimizationResult, Optimizer,
};

/// Sufficient decrease constant.
const ARMIJO_C1: f64 = 1e-4;
/// Curvature constant; small values make the line search more exact.
const CURVATURE_C2: f64 = 0.1;
const MAX_LINE_SEARCH_TRIALS: usize = 40;
const MAX_EXPANSIONS: usize = 10;

/// Conjugate gradient optimizer with an iteration budget.
///
/// # Example
///
/// ```ignore
/// use digit_nn::optimizers::{ConjugateGradient, Optimizer};
///
/// let mut cg = ConjugateGradient::new(50, 1e-5);
/// let result = cg.minimize(&objective, initial)?;
/// ```
#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    max_iterations: usize,
    gradient_tolerance: f64,
}

struct Step {
    alpha: f64,
    x: Vec<f64>,
    loss: f64,
    grad: Vec<f64>,
}

impl ConjugateGradient {
    /// Stop after `max_iterations` or once every gradient entry is within
    /// `gradient_tolerance` of zero.
    pub fn new(max_iterations: usize, gradient_tolerance: f64) -> Self {
        Self {
            max_iterations,
            gradient_tolerance,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn line_search(
        &self,
        objective: &dyn DifferentiableObjective,
        x: &[f64],
        loss: f64,
        direction: &[f64],
        slope: f64,
        alpha0: f64,
        evaluations: &mut usize,
    ) -> Result<Option<Step>> {
        let mut alpha = alpha0;
        let mut accepted: Option<Step> = None;
        let mut expansions = 0usize;

        for _ in 0..MAX_LINE_SEARCH_TRIALS {
            let trial: Vec<f64> = x
                .iter()
                .zip(direction)
                .map(|(xi, di)| xi + alpha * di)
                .collect();
            let (trial_loss, trial_grad) = objective.evaluate(&trial)?;
            *evaluations += 1;

            let sufficient =
                trial_loss.is_finite() && trial_loss <= loss + ARMIJO_C1 * alpha * slope;

            if let Some(best) = accepted.take() {
                // Extrapolating: keep going only while the loss keeps dropping.
                if !sufficient || trial_loss >= best.loss {
                    return Ok(Some(best));
                }
            } else if !sufficient {
                let next = if trial_loss.is_finite() {
                    let denom = 2.0 * (trial_loss - loss - slope * alpha);
                    if denom > 0.0 {
                        -slope * alpha * alpha / denom
                    } else {
                        0.5 * alpha
                    }
                } else {
                    0.1 * alpha
                };
                alpha = next.clamp(0.1 * alpha, 0.5 * alpha);
                continue;
            }

            let step = Step {
                alpha,
                x: trial,
                loss: trial_loss,
                grad: trial_grad,
            };
            let curvature_met = dot(&step.grad, direction) >= CURVATURE_C2 * slope;
            if curvature_met || expansions >= MAX_EXPANSIONS {
                return Ok(Some(step));
            }
            accepted = Some(step);
            alpha *= 2.0;
            expansions += 1;
        }

        Ok(accepted)
    }
}

/// First trial step: assume the loss drops by as much as it did last time.
fn initial_step(loss: f64, previous_loss: f64, slope: f64) -> f64 {
    let alpha = 1.01 * 2.0 * (loss - previous_loss) / slope;
    if alpha.is_finite() && alpha > 0.0 {
        alpha.min(1.0)
    } else {
        1.0
    }
}

impl Optimizer for ConjugateGradient {
    fn minimize(
        &mut self,
        objective: &dyn DifferentiableObjective,
        initial: Vec<f64>,
    ) -> Result<OptimizationResult> {
        check_dimension(objective, &initial)?;

        let mut x = initial;
        let (mut loss, mut grad) = objective.evaluate(&x)?;
        let mut evaluations = 1usize;
        if !loss.is_finite() {
            return Err(NetworkError::InvalidData(
                "objective is not finite at the initial point".to_string(),
            ));
        }

        let mut direction: Vec<f64> = grad.iter().map(|g| -g).collect();
        let mut previous_loss = loss + dot(&grad, &grad).sqrt() / 2.0;
        let mut iterations = 0usize;
        let mut converged = false;

        info!(
            parameters = x.len(),
            max_iterations = self.max_iterations,
            initial_loss = loss,
            "starting conjugate gradient"
        );

        while iterations < self.max_iterations {
            if inf_norm(&grad) <= self.gradient_tolerance {
                converged = true;
                break;
            }

            let mut slope = dot(&grad, &direction);
            let mut steepest = false;
            if slope >= 0.0 {
                debug!(iteration = iterations, "direction is not descending, restarting");
                direction = grad.iter().map(|g| -g).collect();
                slope = -dot(&grad, &grad);
                steepest = true;
            }

            let alpha0 = initial_step(loss, previous_loss, slope);
            let mut step = self.line_search(
                objective,
                &x,
                loss,
                &direction,
                slope,
                alpha0,
                &mut evaluations,
            )?;

            if step.is_none() && !steepest {
                warn!(
                    iteration = iterations,
                    "line search failed along conjugate direction, retrying steepest descent"
                );
                direction = grad.iter().map(|g| -g).collect();
                slope = -dot(&grad, &grad);
                step = self.line_search(
                    objective,
                    &x,
                    loss,
                    &direction,
                    slope,
                    initial_step(loss, previous_loss, slope),
                    &mut evaluations,
                )?;
            }

            let Some(step) = step else {
                warn!(
                    iteration = iterations,
                    loss,
                    "no step decreases the loss, stopping early"
                );
                break;
            };

            // Polak-Ribière+, clipped at zero so a bad beta degrades to steepest descent.
            let beta = ((dot(&step.grad, &step.grad) - dot(&step.grad, &grad))
                / dot(&grad, &grad))
            .max(0.0);
            for (d, g) in direction.iter_mut().zip(&step.grad) {
                *d = -g + beta * *d;
            }

            previous_loss = loss;
            x = step.x;
            loss = step.loss;
            grad = step.grad;
            iterations += 1;

            debug!(
                iteration = iterations,
                loss,
                grad_norm = inf_norm(&grad),
                step = step.alpha,
                "conjugate gradient iteration"
            );
        }

        if !converged && inf_norm(&grad) <= self.gradient_tolerance {
            converged = true;
        }

        info!(
            iterations,
            evaluations,
            loss,
            converged,
            "conjugate gradient finished"
        );

        Ok(OptimizationResult {
            params: x,
            loss,
            iterations,
            evaluations,
            converged,
        })
    }

    fn name(&self) -> &'static str {
        "conjugate_gradient"
    }
}
