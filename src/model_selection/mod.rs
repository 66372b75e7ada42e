//! Train/test splitting.

use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// The four parts of a shuffled hold-out split.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Matrix<f32>,
    pub x_test: Matrix<f32>,
    pub y_train: Vector<f32>,
    pub y_test: Vector<f32>,
}

/// Splits rows into a shuffled train set and a hold-out test set.
///
/// The test set gets `ceil(n_samples * test_size)` rows and the train set the
/// rest. With `random_state` set, the permutation is reproducible.
///
/// # Errors
///
/// Returns an error if `test_size` is not strictly between 0 and 1, `x` and
/// `y` disagree in length, or either side of the split would be empty.
///
/// # Examples
///
/// ```
/// use progression::model_selection::train_test_split;
/// use progression::primitives::{Matrix, Vector};
///
/// let x = Matrix::from_vec(10, 1, (0..10).map(|v| v as f32).collect()).unwrap();
/// let y = Vector::from_vec((0..10).map(|v| v as f32).collect());
///
/// let split = train_test_split(&x, &y, 0.2, Some(42)).unwrap();
/// assert_eq!(split.x_train.n_rows(), 8);
/// assert_eq!(split.y_test.len(), 2);
/// ```
pub fn train_test_split(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    test_size: f64,
    random_state: Option<u64>,
) -> Result<TrainTestSplit> {
    let (n_train, _) = validate_split_inputs(x, y, test_size)?;

    let indices = shuffle_indices(x.n_rows(), random_state);
    let (train_idx, test_idx) = indices.split_at(n_train);

    Ok(TrainTestSplit {
        x_train: x.select_rows(train_idx),
        x_test: x.select_rows(test_idx),
        y_train: y.select(train_idx),
        y_test: y.select(test_idx),
    })
}

fn validate_split_inputs(x: &Matrix<f32>, y: &Vector<f32>, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ProgressionError::InvalidHyperparameter {
            param: "test_size".to_string(),
            value: test_size.to_string(),
            constraint: "a value strictly between 0 and 1".to_string(),
        });
    }

    let n_samples = x.n_rows();
    if n_samples != y.len() {
        return Err(ProgressionError::dimension_mismatch(
            "samples vs targets",
            n_samples,
            y.len(),
        ));
    }

    let n_test = (n_samples as f64 * test_size).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(ProgressionError::InvalidArgument(format!(
            "split would result in empty train or test set (n_train={n_train}, n_test={n_test})"
        )));
    }

    Ok((n_train, n_test))
}

/// Shuffles `0..n_samples` with an optional seed.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    indices.shuffle(&mut rng);
    indices
}
