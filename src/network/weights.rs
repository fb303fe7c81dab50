//! Weight initialization and parameter packing
//!
//! The optimizer only ever sees one flat vector: the row-major entries of W1
//! followed by those of W2. `Weights::flatten` and `Weights::from_flat` are
//! exact inverses over that layout.

use crate::error::{NetworkError, Result};
use crate::utils::{Matrix, SimpleRng};

/// Layer sizes of the two-layer network, bias units excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkShape {
    pub n_input: usize,
    pub n_hidden: usize,
    pub n_class: usize,
}

impl NetworkShape {
    /// Validate and build a shape. Every layer needs at least one unit.
    pub fn new(n_input: usize, n_hidden: usize, n_class: usize) -> Result<Self> {
        if n_input == 0 || n_hidden == 0 || n_class == 0 {
            return Err(NetworkError::InvalidConfig(format!(
                "layer sizes must be positive (n_input={}, n_hidden={}, n_class={})",
                n_input, n_hidden, n_class
            )));
        }
        Ok(Self {
            n_input,
            n_hidden,
            n_class,
        })
    }

    /// Number of entries in W1: n_hidden × (n_input + 1).
    pub fn w1_len(&self) -> usize {
        self.n_hidden * (self.n_input + 1)
    }

    /// Number of entries in W2: n_class × (n_hidden + 1).
    pub fn w2_len(&self) -> usize {
        self.n_class * (self.n_hidden + 1)
    }

    /// Length of the flat parameter vector.
    pub fn parameter_count(&self) -> usize {
        self.w1_len() + self.w2_len()
    }
}

/// Random weight matrix of shape `n_out × (n_in + 1)`.
///
/// Entries are uniform in `[-epsilon, epsilon]` with
/// `epsilon = sqrt(6) / sqrt(n_in + n_out + 1)`, so initial pre-activations
/// stay in the sigmoid's linear region. The last column holds bias weights.
pub fn initialize_weights(n_in: usize, n_out: usize, rng: &mut SimpleRng) -> Matrix {
    let epsilon = 6.0f64.sqrt() / ((n_in + n_out + 1) as f64).sqrt();
    let mut weights = Matrix::zeros(n_out, n_in + 1);
    for value in weights.as_mut_slice() {
        *value = rng.gen_range_f64(-epsilon, epsilon);
    }
    weights
}

/// Both weight matrices of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    /// Input → hidden, `n_hidden × (n_input + 1)`.
    pub w1: Matrix,
    /// Hidden → output, `n_class × (n_hidden + 1)`.
    pub w2: Matrix,
}

impl Weights {
    /// Fresh random weights. W1 is drawn before W2.
    pub fn initialize(shape: NetworkShape, rng: &mut SimpleRng) -> Self {
        let w1 = initialize_weights(shape.n_input, shape.n_hidden, rng);
        let w2 = initialize_weights(shape.n_hidden, shape.n_class, rng);
        Self { w1, w2 }
    }

    /// Pair two matrices, checking they describe a consistent network.
    pub fn new(w1: Matrix, w2: Matrix) -> Result<Self> {
        if w1.cols() < 2 || w1.rows() == 0 {
            return Err(NetworkError::ShapeMismatch(format!(
                "W1 must be n_hidden x (n_input+1) with n_input >= 1, got {}x{}",
                w1.rows(),
                w1.cols()
            )));
        }
        if w2.cols() != w1.rows() + 1 || w2.rows() == 0 {
            return Err(NetworkError::ShapeMismatch(format!(
                "W2 is {}x{} but W1 has {} hidden units (expected n_class x {})",
                w2.rows(),
                w2.cols(),
                w1.rows(),
                w1.rows() + 1
            )));
        }
        Ok(Self { w1, w2 })
    }

    /// Rebuild W1 and W2 from a flat vector laid out as W1 then W2, row-major.
    pub fn from_flat(shape: NetworkShape, params: &[f64]) -> Result<Self> {
        let expected = shape.parameter_count();
        if params.len() != expected {
            return Err(NetworkError::ParameterLength {
                expected,
                actual: params.len(),
            });
        }
        let (head, tail) = params.split_at(shape.w1_len());
        let w1 = Matrix::from_vec(shape.n_hidden, shape.n_input + 1, head.to_vec())?;
        let w2 = Matrix::from_vec(shape.n_class, shape.n_hidden + 1, tail.to_vec())?;
        Ok(Self { w1, w2 })
    }

    /// Concatenate W1 and W2 row-major entries.
    pub fn flatten(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.w1.as_slice().len() + self.w2.as_slice().len());
        flat.extend_from_slice(self.w1.as_slice());
        flat.extend_from_slice(self.w2.as_slice());
        flat
    }

    /// Layer sizes implied by the matrix shapes.
    pub fn shape(&self) -> NetworkShape {
        NetworkShape {
            n_input: self.w1.cols() - 1,
            n_hidden: self.w1.rows(),
            n_class: self.w2.rows(),
        }
    }

    /// Sum of squares over every weight, bias weights included.
    pub fn sum_of_squares(&self) -> f64 {
        self.w1.sum_of_squares() + self.w2.sum_of_squares()
    }
}
