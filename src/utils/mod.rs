//! Shared utilities for the network implementation
//!
//! This module provides the random number generator, the sigmoid activation,
//! and the dense matrix type used by the forward and backward passes.

pub mod activations;
pub mod matrix;
pub mod rng;

pub use activations::{sigmoid, sigmoid_derivative, sigmoid_inplace};
pub use matrix::Matrix;
pub use rng::SimpleRng;
