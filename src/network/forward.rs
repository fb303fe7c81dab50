//! Forward propagation through both sigmoid layers.

use crate::error::{NetworkError, Result};
use crate::utils::{sigmoid_inplace, Matrix};

/// Activations produced by one forward pass.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    /// Output probabilities, `m × n_class`.
    pub output: Matrix,
    /// Hidden activations with the bias column appended, `m × (n_hidden + 1)`.
    pub hidden: Matrix,
}

/// Run the network on a bias-augmented batch `x` of shape `m × (n_input + 1)`.
///
/// hidden = sigmoid(x · W1ᵗ) with a column of ones appended,
/// output = sigmoid(hidden · W2ᵗ).
pub fn forward(w1: &Matrix, w2: &Matrix, x: &Matrix) -> Result<ForwardPass> {
    if x.cols() != w1.cols() {
        return Err(NetworkError::ShapeMismatch(format!(
            "input has {} columns (bias included) but W1 expects {}",
            x.cols(),
            w1.cols()
        )));
    }
    if w2.rows() == 0 {
        return Err(NetworkError::ShapeMismatch(
            "W2 has no rows, the output layer needs at least one class".to_string(),
        ));
    }
    if w2.cols() != w1.rows() + 1 {
        return Err(NetworkError::ShapeMismatch(format!(
            "W2 has {} columns but the hidden layer has {} units plus bias",
            w2.cols(),
            w1.rows()
        )));
    }

    let mut hidden = x.matmul_transpose_b(w1);
    sigmoid_inplace(hidden.as_mut_slice());
    let hidden = hidden.with_bias_column();

    let mut output = hidden.matmul_transpose_b(w2);
    sigmoid_inplace(output.as_mut_slice());

    Ok(ForwardPass { output, hidden })
}
