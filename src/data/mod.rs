//! Data pipeline for MNIST digits
//!
//! Loads the IDX files, removes duplicate training images, scales pixels to
//! [0, 1], optionally drops pixels that never vary, and carves a validation
//! split out of the training set. The resulting matrices carry no bias
//! column; the network appends its own.
//!
//! Expected files in the data directory:
//!
//! - `train-images.idx3-ubyte`, `train-labels.idx1-ubyte`
//! - `t10k-images.idx3-ubyte`, `t10k-labels.idx1-ubyte`

pub mod idx;
pub mod preprocess;

use std::path::Path;

use tracing::info;

use crate::error::{NetworkError, Result};
use crate::utils::Matrix;

pub use preprocess::RawSamples;

pub const TRAIN_IMAGES: &str = "train-images.idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels.idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images.idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels.idx1-ubyte";

/// Feature rows with one 1-indexed class label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub features: Matrix,
    pub labels: Vec<usize>,
}

impl Dataset {
    pub fn new(features: Matrix, labels: Vec<usize>) -> Result<Self> {
        if features.rows() != labels.len() {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                features.rows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.cols()
    }

    /// Rows at `indices`, in order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Keep only the given feature columns.
    pub fn keep_columns(&self, columns: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select_columns(columns),
            labels: self.labels.clone(),
        }
    }
}

/// How raw samples are turned into splits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    pub deduplicate: bool,
    pub validation_fraction: f64,
    pub drop_constant_features: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            deduplicate: true,
            validation_fraction: 0.2,
            drop_constant_features: false,
        }
    }
}

/// Train, validation and test sets sharing one feature layout.
#[derive(Debug, Clone)]
pub struct Splits {
    pub train: Dataset,
    pub validation: Dataset,
    pub test: Dataset,
    /// Features per row after preprocessing.
    pub n_input: usize,
}

/// Turn raw training and test samples into normalized splits.
///
/// Only the training samples are deduplicated and split; the test samples
/// are normalized and receive the same feature selection.
pub fn preprocess(
    train: RawSamples,
    test: RawSamples,
    options: &PreprocessOptions,
) -> Result<Splits> {
    if train.row_len != test.row_len {
        return Err(NetworkError::ShapeMismatch(format!(
            "training images have {} pixels, test images have {}",
            train.row_len, test.row_len
        )));
    }

    let train = if options.deduplicate {
        let (unique, removed) = preprocess::deduplicate(train);
        info!(removed, remaining = unique.len(), "removed duplicate training rows");
        unique
    } else {
        train
    };

    let mut full_train = preprocess::normalize(&train)?;
    let mut test = preprocess::normalize(&test)?;

    if options.drop_constant_features {
        let kept = preprocess::varying_columns(&full_train.features);
        info!(
            kept = kept.len(),
            dropped = full_train.n_features() - kept.len(),
            "dropped constant features"
        );
        full_train = full_train.keep_columns(&kept);
        test = test.keep_columns(&kept);
    }

    let (train, validation) =
        preprocess::split_validation(&full_train, options.validation_fraction)?;
    let n_input = train.n_features();

    info!(
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        n_input,
        "preprocess done"
    );

    Ok(Splits {
        train,
        validation,
        test,
        n_input,
    })
}

/// Read the four MNIST IDX files from `dir` and preprocess them.
pub fn load_mnist<P: AsRef<Path>>(dir: P, options: &PreprocessOptions) -> Result<Splits> {
    let dir = dir.as_ref();
    let load = |images: &str, labels: &str| -> Result<RawSamples> {
        let images = idx::read_images(dir.join(images))?;
        let labels = idx::read_labels(dir.join(labels))?;
        RawSamples::from_idx(images, &labels)
    };

    let train = load(TRAIN_IMAGES, TRAIN_LABELS)?;
    let test = load(TEST_IMAGES, TEST_LABELS)?;
    info!(
        train = train.len(),
        test = test.len(),
        dir = %dir.display(),
        "loaded MNIST"
    );

    preprocess(train, test, options)
}
