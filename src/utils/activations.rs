//! Logistic activation used by both layers of the network.
//!
//! The textbook form `1 / (1 + exp(-z))` overflows `exp` for large negative
//! inputs, so the evaluation branches on the sign of `z` and the result is
//! kept strictly inside (0, 1).

/// Smallest distance kept between a sigmoid output and the bounds 0 and 1.
pub const SIGMOID_MARGIN: f64 = 1e-15;

/// Sigmoid activation function.
///
/// Returns `1 / (1 + exp(-z))`, evaluated without overflow and clamped to
/// `[SIGMOID_MARGIN, 1 - SIGMOID_MARGIN]`.
pub fn sigmoid(z: f64) -> f64 {
    let value = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    value.clamp(SIGMOID_MARGIN, 1.0 - SIGMOID_MARGIN)
}

/// Sigmoid derivative assuming s = sigmoid(z).
///
/// Returns the derivative: s * (1 - s)
pub fn sigmoid_derivative(s: f64) -> f64 {
    s * (1.0 - s)
}

/// Sigmoid applied in-place to a flat buffer.
pub fn sigmoid_inplace(data: &mut [f64]) {
    for value in data.iter_mut() {
        *value = sigmoid(*value);
    }
}
