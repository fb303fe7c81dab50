// Tests for backward propagation: the batched gradient from the objective is
// compared with per-example backprop written as explicit loops, and the loss
// with a direct evaluation of the cross-entropy formula.

use approx::assert_relative_eq;
use digit_nn::network::{NetworkShape, ObjectiveFunction, Weights};
use digit_nn::utils::{sigmoid, sigmoid_derivative, Matrix, SimpleRng};

struct Reference {
    loss: f64,
    grad_w1: Vec<Vec<f64>>,
    grad_w2: Vec<Vec<f64>>,
}

// Accumulate loss and gradients one example at a time.
#[allow(clippy::needless_range_loop)]
fn reference_backprop(
    weights: &Weights,
    data: &[Vec<f64>],
    labels: &[usize],
    lambda: f64,
) -> Reference {
    let shape = weights.shape();
    let m = data.len() as f64;
    let mut loss = 0.0;
    let mut grad_w1 = vec![vec![0.0; shape.n_input + 1]; shape.n_hidden];
    let mut grad_w2 = vec![vec![0.0; shape.n_hidden + 1]; shape.n_class];

    for (x, &label) in data.iter().zip(labels) {
        let mut input = x.clone();
        input.push(1.0);

        let mut hidden = vec![1.0; shape.n_hidden + 1];
        for j in 0..shape.n_hidden {
            let z: f64 = (0..=shape.n_input).map(|i| weights.w1.get(j, i) * input[i]).sum();
            hidden[j] = sigmoid(z);
        }

        let mut delta_out = vec![0.0; shape.n_class];
        for k in 0..shape.n_class {
            let z: f64 = (0..=shape.n_hidden).map(|j| weights.w2.get(k, j) * hidden[j]).sum();
            let o = sigmoid(z);
            let y = if k + 1 == label { 1.0 } else { 0.0 };
            loss -= y * o.ln() + (1.0 - y) * (1.0 - o).ln();
            delta_out[k] = o - y;
        }

        for k in 0..shape.n_class {
            for j in 0..=shape.n_hidden {
                grad_w2[k][j] += delta_out[k] * hidden[j];
            }
        }

        for j in 0..shape.n_hidden {
            let back: f64 = (0..shape.n_class).map(|k| delta_out[k] * weights.w2.get(k, j)).sum();
            let delta_hidden = back * sigmoid_derivative(hidden[j]);
            for i in 0..=shape.n_input {
                grad_w1[j][i] += delta_hidden * input[i];
            }
        }
    }

    let penalty = lambda / (2.0 * m) * weights.sum_of_squares();
    for j in 0..shape.n_hidden {
        for i in 0..=shape.n_input {
            grad_w1[j][i] = (grad_w1[j][i] + lambda * weights.w1.get(j, i)) / m;
        }
    }
    for k in 0..shape.n_class {
        for j in 0..=shape.n_hidden {
            grad_w2[k][j] = (grad_w2[k][j] + lambda * weights.w2.get(k, j)) / m;
        }
    }

    Reference {
        loss: loss / m + penalty,
        grad_w1,
        grad_w2,
    }
}

fn compare(shape: NetworkShape, m: usize, lambda: f64, seed: u64) {
    let mut rng = SimpleRng::new(seed);
    let rows: Vec<Vec<f64>> = (0..m)
        .map(|_| (0..shape.n_input).map(|_| rng.next_f64()).collect())
        .collect();
    let labels: Vec<usize> = (0..m).map(|i| (i * 7) % shape.n_class + 1).collect();
    let data = Matrix::from_rows(&rows).unwrap();
    let weights = Weights::initialize(shape, &mut rng);

    let objective = ObjectiveFunction::new(shape, &data, &labels, lambda).unwrap();
    let (loss, grad) = objective.evaluate(&weights.flatten()).unwrap();
    let reference = reference_backprop(&weights, &rows, &labels, lambda);

    assert_relative_eq!(loss, reference.loss, epsilon = 1e-12, max_relative = 1e-10);

    let expected: Vec<f64> = reference
        .grad_w1
        .iter()
        .chain(reference.grad_w2.iter())
        .flatten()
        .copied()
        .collect();
    assert_eq!(grad.len(), expected.len());
    for (i, (a, b)) in grad.iter().zip(&expected).enumerate() {
        assert!(
            (a - b).abs() < 1e-12,
            "gradient entry {} differs: batched={:.15}, reference={:.15}",
            i,
            a,
            b
        );
    }
}

#[test]
fn test_backprop_matches_reference_unregularized() {
    compare(NetworkShape::new(3, 2, 2).unwrap(), 5, 0.0, 1);
}

#[test]
fn test_backprop_matches_reference_regularized() {
    compare(NetworkShape::new(4, 3, 3).unwrap(), 9, 1.5, 2);
}

#[test]
fn test_backprop_matches_reference_ten_classes() {
    compare(NetworkShape::new(8, 6, 10).unwrap(), 20, 50.0, 3);
}

#[test]
fn test_objective_is_pure() {
    let shape = NetworkShape::new(3, 2, 2).unwrap();
    let data = Matrix::from_rows(&[vec![0.1, 0.2, 0.3], vec![0.9, 0.8, 0.7]]).unwrap();
    let labels = vec![1, 2];
    let objective = ObjectiveFunction::new(shape, &data, &labels, 0.5).unwrap();
    let params = Weights::initialize(shape, &mut SimpleRng::new(4)).flatten();
    let params_before = params.clone();

    let first = objective.evaluate(&params).unwrap();
    let other = vec![0.25; shape.parameter_count()];
    let _ = objective.evaluate(&other).unwrap();
    let second = objective.evaluate(&params).unwrap();

    assert_eq!(params, params_before);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}
