//! Two-layer neural network for handwritten digit recognition
//!
//! A single hidden layer of sigmoid units feeds a sigmoid output layer, one
//! unit per class. The network is trained full-batch: the regularized
//! cross-entropy loss and its backpropagated gradient are exposed as a pure
//! function of a flat parameter vector, and an iterative optimizer drives it.
//!
//! # Modules
//!
//! - `network`: weight initialization, forward pass, objective, prediction
//! - `optimizers`: optimizer trait, conjugate gradient and gradient descent
//! - `data`: MNIST IDX loading, deduplication, normalization, splitting
//! - `training`: the driver tying initialization, optimization and evaluation together
//! - `config`: training configuration loaded from JSON
//! - `utils`: random number generator, sigmoid, dense matrix
//! - `error`: crate error type

pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod optimizers;
pub mod training;
pub mod utils;

pub use error::{NetworkError, Result};
