// Tests for the row-major matrix helpers used by forward and backward
// propagation. Products are compared against naive triple loops.

use approx::assert_relative_eq;
use digit_nn::utils::{Matrix, SimpleRng};

fn random(rng: &mut SimpleRng, rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|_| rng.gen_range_f64(-2.0, 2.0)).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn transpose(m: &Matrix) -> Matrix {
    let mut t = Matrix::zeros(m.cols(), m.rows());
    for r in 0..m.rows() {
        for c in 0..m.cols() {
            t.set(c, r, m.get(r, c));
        }
    }
    t
}

fn naive_matmul(a: &Matrix, b: &Matrix) -> Matrix {
    let mut out = Matrix::zeros(a.rows(), b.cols());
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut sum = 0.0;
            for k in 0..a.cols() {
                sum += a.get(i, k) * b.get(k, j);
            }
            out.set(i, j, sum);
        }
    }
    out
}

fn assert_matrix_eq(actual: &Matrix, expected: &Matrix) {
    assert_eq!((actual.rows(), actual.cols()), (expected.rows(), expected.cols()));
    for (a, e) in actual.as_slice().iter().zip(expected.as_slice()) {
        assert_relative_eq!(*a, *e, epsilon = 1e-12);
    }
}

mod product_tests {
    use super::*;

    #[test]
    fn test_matmul_basic() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(&[vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        assert_eq!(a.matmul(&b).as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_matches_naive() {
        let mut rng = SimpleRng::new(1);
        let a = random(&mut rng, 7, 5);
        let b = random(&mut rng, 5, 3);
        assert_matrix_eq(&a.matmul(&b), &naive_matmul(&a, &b));
    }

    #[test]
    fn test_matmul_transpose_b_matches_naive() {
        let mut rng = SimpleRng::new(2);
        let a = random(&mut rng, 6, 4);
        let b = random(&mut rng, 3, 4);
        assert_matrix_eq(&a.matmul_transpose_b(&b), &naive_matmul(&a, &transpose(&b)));
    }

    #[test]
    fn test_transpose_matmul_matches_naive() {
        let mut rng = SimpleRng::new(3);
        let a = random(&mut rng, 8, 3);
        let b = random(&mut rng, 8, 5);
        assert_matrix_eq(&a.transpose_matmul(&b), &naive_matmul(&transpose(&a), &b));
    }

    #[test]
    fn test_single_element_products() {
        let a = Matrix::from_vec(1, 1, vec![3.0]).unwrap();
        let b = Matrix::from_vec(1, 1, vec![-4.0]).unwrap();
        assert_eq!(a.matmul(&b).as_slice(), &[-12.0]);
        assert_eq!(a.matmul_transpose_b(&b).as_slice(), &[-12.0]);
        assert_eq!(a.transpose_matmul(&b).as_slice(), &[-12.0]);
    }
}

mod shape_tests {
    use super::*;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 3, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_bias_column_round_trip() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let with_bias = m.with_bias_column();
        assert_eq!(with_bias.cols(), 3);
        for r in 0..with_bias.rows() {
            assert_eq!(with_bias.get(r, 2), 1.0);
        }
        assert_eq!(with_bias.without_last_column(), m);
    }

    #[test]
    fn test_select_rows_and_columns() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], vec![7.0, 8.0, 9.0]])
            .unwrap();
        assert_eq!(m.select_rows(&[2, 0]).as_slice(), &[7.0, 8.0, 9.0, 1.0, 2.0, 3.0]);
        assert_eq!(m.select_columns(&[1]).as_slice(), &[2.0, 5.0, 8.0]);
        assert_eq!(m.select_rows(&[]).rows(), 0);
    }

    #[test]
    fn test_sum_of_squares() {
        let m = Matrix::from_rows(&[vec![2.0, -4.0], vec![6.0, 1.0]]).unwrap();
        assert_relative_eq!(m.sum_of_squares(), 57.0);
    }
}
