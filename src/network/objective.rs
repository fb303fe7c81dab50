//! Regularized cross-entropy objective and its backpropagated gradient
//!
//! `ObjectiveFunction` bundles the layer sizes, the training data, its labels
//! and the regularization strength. Evaluating it at a flat parameter vector
//! returns the loss together with a gradient laid out exactly like the input
//! (W1 entries, then W2 entries, row-major). Evaluation never mutates the
//! objective, so one instance can serve any number of optimizer iterations.

use crate::error::{NetworkError, Result};
use crate::network::forward::forward;
use crate::network::weights::{NetworkShape, Weights};
use crate::optimizers::DifferentiableObjective;
use crate::utils::{sigmoid_derivative, Matrix};

/// Outputs are kept at least this far from 0 and 1 inside the logarithms.
pub const LOG_CLAMP: f64 = 1e-12;

/// One-hot target matrix for 1-indexed labels.
///
/// Row `i` holds a single 1.0 at column `labels[i] - 1`.
pub fn one_hot(labels: &[usize], n_class: usize) -> Result<Matrix> {
    let mut targets = Matrix::zeros(labels.len(), n_class);
    for (index, &label) in labels.iter().enumerate() {
        if label < 1 || label > n_class {
            return Err(NetworkError::LabelOutOfRange {
                index,
                label,
                n_class,
            });
        }
        targets.set(index, label - 1, 1.0);
    }
    Ok(targets)
}

/// L2 penalty `lambda / (2m) * (ΣW1² + ΣW2²)`.
pub fn regularization_term(weights: &Weights, lambda: f64, m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    lambda / (2.0 * m as f64) * weights.sum_of_squares()
}

/// Loss and gradient oracle for the two-layer network.
#[derive(Debug, Clone)]
pub struct ObjectiveFunction<'a> {
    shape: NetworkShape,
    data: &'a Matrix,
    labels: &'a [usize],
    lambda: f64,
    inputs: Matrix,
    targets: Matrix,
}

impl<'a> ObjectiveFunction<'a> {
    /// Bind training data to the objective.
    ///
    /// `data` is the raw `m × n_input` feature matrix (no bias column) and
    /// `labels` holds one class id in `[1, n_class]` per row.
    pub fn new(
        shape: NetworkShape,
        data: &'a Matrix,
        labels: &'a [usize],
        lambda: f64,
    ) -> Result<Self> {
        if data.cols() != shape.n_input {
            return Err(NetworkError::ShapeMismatch(format!(
                "training data has {} features, network expects {}",
                data.cols(),
                shape.n_input
            )));
        }
        if data.rows() != labels.len() {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} training rows but {} labels",
                data.rows(),
                labels.len()
            )));
        }
        if data.rows() == 0 {
            return Err(NetworkError::InvalidData(
                "training set is empty".to_string(),
            ));
        }
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "lambda must be finite and non-negative, got {}",
                lambda
            )));
        }

        let targets = one_hot(labels, shape.n_class)?;
        let inputs = data.with_bias_column();

        Ok(Self {
            shape,
            data,
            labels,
            lambda,
            inputs,
            targets,
        })
    }

    pub fn shape(&self) -> NetworkShape {
        self.shape
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn data(&self) -> &Matrix {
        self.data
    }

    pub fn labels(&self) -> &[usize] {
        self.labels
    }

    /// Number of training examples.
    pub fn num_examples(&self) -> usize {
        self.data.rows()
    }

    /// Loss alone, without the backward pass.
    pub fn loss(&self, params: &[f64]) -> Result<f64> {
        let weights = Weights::from_flat(self.shape, params)?;
        let pass = forward(&weights.w1, &weights.w2, &self.inputs)?;
        Ok(self.cross_entropy(&pass.output)
            + regularization_term(&weights, self.lambda, self.num_examples()))
    }

    /// Loss and gradient at `params`.
    pub fn evaluate(&self, params: &[f64]) -> Result<(f64, Vec<f64>)> {
        let weights = Weights::from_flat(self.shape, params)?;
        let m = self.num_examples() as f64;

        let pass = forward(&weights.w1, &weights.w2, &self.inputs)?;
        let loss = self.cross_entropy(&pass.output)
            + regularization_term(&weights, self.lambda, self.num_examples());

        // delta_out = output - Y
        let mut delta_out = pass.output;
        for (d, &y) in delta_out
            .as_mut_slice()
            .iter_mut()
            .zip(self.targets.as_slice())
        {
            *d -= y;
        }

        let mut grad_w2 = delta_out.transpose_matmul(&pass.hidden);
        scale_with_penalty(&mut grad_w2, &weights.w2, self.lambda, m);

        // Back through W2 and the hidden sigmoid; the bias unit has no inputs.
        let mut delta_hidden = delta_out.matmul(&weights.w2);
        for (d, &h) in delta_hidden
            .as_mut_slice()
            .iter_mut()
            .zip(pass.hidden.as_slice())
        {
            *d *= sigmoid_derivative(h);
        }
        let delta_hidden = delta_hidden.without_last_column();

        let mut grad_w1 = delta_hidden.transpose_matmul(&self.inputs);
        scale_with_penalty(&mut grad_w1, &weights.w1, self.lambda, m);

        let mut grad = grad_w1.into_vec();
        grad.extend_from_slice(grad_w2.as_slice());
        Ok((loss, grad))
    }

    fn cross_entropy(&self, output: &Matrix) -> f64 {
        let mut total = 0.0;
        for (&o, &y) in output.as_slice().iter().zip(self.targets.as_slice()) {
            let o = o.clamp(LOG_CLAMP, 1.0 - LOG_CLAMP);
            total += y * o.ln() + (1.0 - y) * (1.0 - o).ln();
        }
        -total / self.num_examples() as f64
    }
}

/// grad = (grad + lambda * w) / m
fn scale_with_penalty(grad: &mut Matrix, w: &Matrix, lambda: f64, m: f64) {
    for (g, &w) in grad.as_mut_slice().iter_mut().zip(w.as_slice()) {
        *g = (*g + lambda * w) / m;
    }
}

impl DifferentiableObjective for ObjectiveFunction<'_> {
    fn dimension(&self) -> usize {
        self.shape.parameter_count()
    }

    fn evaluate(&self, params: &[f64]) -> Result<(f64, Vec<f64>)> {
        ObjectiveFunction::evaluate(self, params)
    }
}
