//! Dense row-major matrix with the handful of products the network needs.
//!
//! Storage is a flat `Vec<f64>` of length `rows * cols`, the same layout the
//! optimizer sees once weight matrices are flattened. Products are plain
//! loops ordered so the innermost index walks contiguous memory.

use crate::error::{NetworkError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Matrix of zeros with the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap a row-major buffer, checking that its length matches the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(NetworkError::ShapeMismatch(format!(
                "buffer of length {} cannot hold a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(NetworkError::ShapeMismatch(format!(
                    "row {} has {} columns, expected {}",
                    index,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    /// Copy of `self` with a trailing column of 1.0 appended to every row.
    pub fn with_bias_column(&self) -> Matrix {
        let cols = self.cols + 1;
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(self.row(r));
            data.push(1.0);
        }
        Matrix {
            rows: self.rows,
            cols,
            data,
        }
    }

    /// Copy of `self` with the last column removed.
    pub fn without_last_column(&self) -> Matrix {
        assert!(self.cols > 0, "cannot drop a column from an empty matrix");
        self.select_columns(&(0..self.cols - 1).collect::<Vec<_>>())
    }

    /// Rows at `indices`, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &index in indices {
            data.extend_from_slice(self.row(index));
        }
        Matrix {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Columns at `indices`, in the given order.
    pub fn select_columns(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(self.rows * indices.len());
        for r in 0..self.rows {
            let row = self.row(r);
            data.extend(indices.iter().map(|&c| row[c]));
        }
        Matrix {
            rows: self.rows,
            cols: indices.len(),
            data,
        }
    }

    /// `self · other` for `self` (m×k) and `other` (k×n).
    pub fn matmul(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.cols, other.rows, "inner dimensions differ in matmul");
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            let out_row = &mut out.data[i * other.cols..(i + 1) * other.cols];
            for (k, &a) in self.row(i).iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                for (o, &b) in out_row.iter_mut().zip(other.row(k)) {
                    *o += a * b;
                }
            }
        }
        out
    }

    /// `self · otherᵗ` for `self` (m×k) and `other` (n×k).
    pub fn matmul_transpose_b(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.cols,
            "inner dimensions differ in matmul_transpose_b"
        );
        let mut out = Matrix::zeros(self.rows, other.rows);
        for i in 0..self.rows {
            let a = self.row(i);
            for j in 0..other.rows {
                let b = other.row(j);
                out.data[i * other.rows + j] = a.iter().zip(b).map(|(x, y)| x * y).sum();
            }
        }
        out
    }

    /// `selfᵗ · other` for `self` (m×a) and `other` (m×b).
    pub fn transpose_matmul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.rows, other.rows,
            "row counts differ in transpose_matmul"
        );
        let mut out = Matrix::zeros(self.cols, other.cols);
        for r in 0..self.rows {
            let b = other.row(r);
            for (i, &a) in self.row(r).iter().enumerate() {
                if a == 0.0 {
                    continue;
                }
                let out_row = &mut out.data[i * other.cols..(i + 1) * other.cols];
                for (o, &v) in out_row.iter_mut().zip(b) {
                    *o += a * v;
                }
            }
        }
        out
    }

    /// Sum of squared entries (squared Frobenius norm).
    pub fn sum_of_squares(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_with_bias_column_appends_ones() {
        let m = sample().with_bias_column();
        assert_eq!(m.cols(), 4);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0, 1.0]);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn test_with_bias_column_on_zero_width_rows() {
        let m = Matrix::zeros(3, 0).with_bias_column();
        assert_eq!(m.cols(), 1);
        assert_eq!(m.as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_without_last_column() {
        let m = sample().without_last_column();
        assert_eq!(m.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn test_products_agree() {
        let a = sample();
        let b = Matrix::from_rows(&[vec![1.0, 0.0, -1.0], vec![2.0, 1.0, 0.5]]).unwrap();

        // a · bᵗ
        let abt = a.matmul_transpose_b(&b);
        assert_eq!(abt.rows(), 2);
        assert_eq!(abt.cols(), 2);
        assert_eq!(abt.as_slice(), &[-2.0, 5.5, -2.0, 16.0]);

        // aᵗ · b
        let atb = a.transpose_matmul(&b);
        assert_eq!(atb.rows(), 3);
        assert_eq!(atb.cols(), 3);
        assert_eq!(atb.row(0), &[9.0, 4.0, 1.0]);

        // a · c where c = aᵗ
        let c = Matrix::from_rows(&[vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]).unwrap();
        assert_eq!(a.matmul(&c), a.matmul_transpose_b(&a));
    }

    #[test]
    fn test_select_rows_and_columns() {
        let m = sample();
        assert_eq!(m.select_rows(&[1]).as_slice(), &[4.0, 5.0, 6.0]);
        assert_eq!(m.select_columns(&[2, 0]).as_slice(), &[3.0, 1.0, 6.0, 4.0]);
    }

    #[test]
    fn test_sum_of_squares() {
        assert_eq!(sample().sum_of_squares(), 91.0);
    }
}
