//! Class prediction and accuracy.

use crate::error::{NetworkError, Result};
use crate::network::forward::forward;
use crate::utils::Matrix;

/// Predicted class id (1-indexed) for each row of the raw feature matrix.
///
/// The bias column is appended here; ties go to the lowest class.
pub fn predict(w1: &Matrix, w2: &Matrix, data: &Matrix) -> Result<Vec<usize>> {
    let inputs = data.with_bias_column();
    let pass = forward(w1, w2, &inputs)?;

    let labels = (0..pass.output.rows())
        .map(|r| {
            let row = pass.output.row(r);
            let mut predicted = 0usize;
            let mut max_prob = row[0];
            for (i, &value) in row.iter().enumerate().skip(1) {
                if value > max_prob {
                    max_prob = value;
                    predicted = i;
                }
            }
            predicted + 1
        })
        .collect();
    Ok(labels)
}

/// Percentage of positions where `predicted` equals `truth`.
///
/// An empty split scores 0.0.
pub fn accuracy(predicted: &[usize], truth: &[usize]) -> Result<f64> {
    if predicted.len() != truth.len() {
        return Err(NetworkError::ShapeMismatch(format!(
            "{} predictions for {} labels",
            predicted.len(),
            truth.len()
        )));
    }
    if truth.is_empty() {
        return Ok(0.0);
    }
    let correct = predicted
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    Ok(100.0 * correct as f64 / truth.len() as f64)
}
