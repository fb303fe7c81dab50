//! Preprocessing steps between raw IDX bytes and the three data splits.

use std::collections::HashMap;

use crate::data::idx::IdxImages;
use crate::data::Dataset;
use crate::error::{NetworkError, Result};
use crate::utils::Matrix;

/// Images as bytes with 1-indexed class labels, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSamples {
    /// Pixels per image.
    pub row_len: usize,
    pub pixels: Vec<u8>,
    pub labels: Vec<usize>,
}

impl RawSamples {
    /// Pair IDX images with their digit labels; digit `d` becomes class `d + 1`.
    pub fn from_idx(images: IdxImages, digits: &[u8]) -> Result<Self> {
        if images.count != digits.len() {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} images but {} labels",
                images.count,
                digits.len()
            )));
        }
        if let Some(index) = digits.iter().position(|&d| d > 9) {
            return Err(NetworkError::InvalidData(format!(
                "label {} at row {} is not a digit",
                digits[index], index
            )));
        }
        Ok(Self {
            row_len: images.image_size(),
            pixels: images.pixels,
            labels: digits.iter().map(|&d| d as usize + 1).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn row(&self, index: usize) -> &[u8] {
        &self.pixels[index * self.row_len..(index + 1) * self.row_len]
    }
}

/// Drop every row whose pixels reappear later in the set.
///
/// Only the last copy of each distinct image survives, and surviving rows
/// keep their relative order. Labels are not compared. Returns the filtered
/// samples and the number of rows removed.
pub fn deduplicate(raw: RawSamples) -> (RawSamples, usize) {
    let mut last_seen: HashMap<&[u8], usize> = HashMap::with_capacity(raw.len());
    for index in 0..raw.len() {
        last_seen.insert(raw.row(index), index);
    }

    let keep: Vec<usize> = (0..raw.len())
        .filter(|&index| last_seen.get(raw.row(index)) == Some(&index))
        .collect();
    let removed = raw.len() - keep.len();

    let mut pixels = Vec::with_capacity(keep.len() * raw.row_len);
    let mut labels = Vec::with_capacity(keep.len());
    for &index in &keep {
        pixels.extend_from_slice(raw.row(index));
        labels.push(raw.labels[index]);
    }

    (
        RawSamples {
            row_len: raw.row_len,
            pixels,
            labels,
        },
        removed,
    )
}

/// Scale bytes to [0, 1] by dividing by 255.
pub fn normalize(raw: &RawSamples) -> Result<Dataset> {
    let values = raw.pixels.iter().map(|&p| p as f64 / 255.0).collect();
    let features = Matrix::from_vec(raw.len(), raw.row_len, values)?;
    Dataset::new(features, raw.labels.clone())
}

/// Indices of columns that take more than one value.
pub fn varying_columns(features: &Matrix) -> Vec<usize> {
    if features.rows() == 0 {
        return (0..features.cols()).collect();
    }
    let first = features.row(0);
    (0..features.cols())
        .filter(|&c| (1..features.rows()).any(|r| features.get(r, c) != first[c]))
        .collect()
}

/// Split off every `stride`-th row as the validation set.
///
/// `floor(len * fraction)` rows are taken at indices `0, stride, 2*stride, ...`
/// where `stride = round(1 / fraction)`; the rest is the training set.
pub fn split_validation(data: &Dataset, fraction: f64) -> Result<(Dataset, Dataset)> {
    if !(0.0..1.0).contains(&fraction) {
        return Err(NetworkError::InvalidConfig(format!(
            "validation fraction {} is outside [0, 1)",
            fraction
        )));
    }

    let len = data.len();
    let mut count = (len as f64 * fraction).floor() as usize;
    let stride = if count == 0 {
        1
    } else {
        ((1.0 / fraction).round() as usize).max(1)
    };
    count = count.min((len + stride - 1) / stride);

    let validation_rows: Vec<usize> = (0..count).map(|i| i * stride).collect();
    let mut is_validation = vec![false; len];
    for &index in &validation_rows {
        is_validation[index] = true;
    }
    let train_rows: Vec<usize> = (0..len).filter(|&i| !is_validation[i]).collect();

    Ok((data.select(&train_rows), data.select(&validation_rows)))
}
