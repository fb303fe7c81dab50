// Tests for the sigmoid activation: bounds, symmetry, stability, and its
// derivative checked against finite differences.

use approx::assert_relative_eq;
use digit_nn::utils::activations::{sigmoid, sigmoid_derivative, sigmoid_inplace, SIGMOID_MARGIN};

#[test]
fn test_sigmoid_at_zero_is_half() {
    assert_eq!(sigmoid(0.0), 0.5);
}

#[test]
fn test_sigmoid_known_values() {
    assert_relative_eq!(sigmoid(1.0), 0.7310585786300049, epsilon = 1e-15);
    assert_relative_eq!(sigmoid(-1.0), 0.2689414213699951, epsilon = 1e-15);
    assert_relative_eq!(sigmoid(4.0), 0.9820137900379085, epsilon = 1e-15);
}

#[test]
fn test_sigmoid_open_interval_over_wide_range() {
    let mut z = -2000.0;
    while z <= 2000.0 {
        let s = sigmoid(z);
        assert!(s > 0.0 && s < 1.0, "sigmoid({}) = {}", z, s);
        z += 0.5;
    }
}

#[test]
fn test_sigmoid_saturates_at_margin() {
    assert_eq!(sigmoid(-1.0e4), SIGMOID_MARGIN);
    assert_eq!(sigmoid(1.0e4), 1.0 - SIGMOID_MARGIN);
}

#[test]
fn test_sigmoid_monotonic() {
    let mut previous = sigmoid(-30.0);
    let mut z = -29.9;
    while z < 30.0 {
        let current = sigmoid(z);
        assert!(current >= previous);
        previous = current;
        z += 0.1;
    }
}

#[test]
fn test_sigmoid_derivative_matches_finite_difference() {
    let epsilon = 1e-6;
    for &z in &[-5.0, -1.3, 0.0, 0.4, 2.2, 6.0] {
        let numerical = (sigmoid(z + epsilon) - sigmoid(z - epsilon)) / (2.0 * epsilon);
        let analytical = sigmoid_derivative(sigmoid(z));
        assert_relative_eq!(numerical, analytical, epsilon = 1e-9);
    }
}

#[test]
fn test_sigmoid_inplace_matches_scalar() {
    let inputs = vec![-3.0, -0.5, 0.0, 0.5, 3.0];
    let mut data = inputs.clone();
    sigmoid_inplace(&mut data);
    for (value, z) in data.iter().zip(&inputs) {
        assert_eq!(*value, sigmoid(*z));
    }
}
