//! The two-layer sigmoid network
//!
//! - `weights`: layer shapes, random initialization, flat parameter packing
//! - `forward`: forward propagation
//! - `objective`: regularized cross-entropy loss and its gradient
//! - `predict`: class prediction and accuracy

pub mod forward;
pub mod objective;
pub mod predict;
pub mod weights;

pub use forward::{forward, ForwardPass};
pub use objective::{one_hot, regularization_term, ObjectiveFunction};
pub use predict::{accuracy, predict};
pub use weights::{initialize_weights, NetworkShape, Weights};
