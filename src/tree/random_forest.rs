use super::{check_width, DecisionTreeRegressor};
use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Bagged ensemble of regression trees.
///
/// Each tree is grown on a bootstrap sample of the training rows and the
/// forest predicts the mean of the tree outputs. With a random state `s`,
/// tree `i` draws its sample from a generator seeded with `s + i`, so a fit
/// is reproducible tree by tree.
///
/// # Examples
///
/// ```
/// use progression::prelude::*;
///
/// let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0]).unwrap();
/// let y = Vector::from_slice(&[1.0, 1.0, 1.0, 9.0, 9.0, 9.0]);
///
/// let mut forest = RandomForestRegressor::new(20).with_random_state(42);
/// forest.fit(&x, &y).unwrap();
/// let pred = forest.predict(&x).unwrap();
/// assert!(pred[0] < 5.0 && pred[5] > 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<DecisionTreeRegressor>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
    n_features: Option<usize>,
}

impl RandomForestRegressor {
    /// Creates a forest of `n_estimators` fully grown trees.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
            n_features: None,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Seeds the bootstrap sampling.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    /// Fitted trees (empty before `fit`).
    #[must_use]
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

impl Estimator for RandomForestRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(ProgressionError::InvalidHyperparameter {
                param: "n_estimators".to_string(),
                value: "0".to_string(),
                constraint: "at least 1".to_string(),
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
        if n_samples == 0 {
            return Err(ProgressionError::empty_input("cannot fit a forest with zero samples"));
        }

        let mut trees = Vec::with_capacity(self.n_estimators);
        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s.wrapping_add(i as u64));
            let sample = bootstrap_sample(n_samples, seed);

            let mut tree = DecisionTreeRegressor::new();
            if let Some(depth) = self.max_depth {
                tree = tree.with_max_depth(depth);
            }
            tree.fit_indices(x, y, &sample)?;
            trees.push(tree);
        }

        self.trees = trees;
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let n_features = self
            .n_features
            .ok_or(ProgressionError::NotFitted("RandomForestRegressor"))?;
        check_width(x, n_features)?;

        let n_trees = self.trees.len() as f64;
        (0..x.n_rows())
            .map(|i| {
                let row = x.row_slice(i);
                let mut total = 0.0_f64;
                for tree in &self.trees {
                    total += f64::from(tree.predict_row(row)?);
                }
                Ok((total / n_trees) as f32)
            })
            .collect()
    }
}

/// Draws `n_samples` row indices with replacement.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    let dist = Uniform::from(0..n_samples);
    let mut rng = match random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    dist.sample_iter(&mut rng).take(n_samples).collect()
}
