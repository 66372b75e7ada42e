//! Regression trees and bootstrap forests.
//!
//! Trees are grown CART-style: every split minimizes the summed squared
//! error of the two children, thresholds sit halfway between adjacent
//! distinct feature values, and samples with `feature <= threshold` go left.
//!
//! # Example
//!
//! ```
//! use progression::prelude::*;
//! use progression::tree::DecisionTreeRegressor;
//!
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 10.0, 11.0]).unwrap();
//! let y = Vector::from_slice(&[5.0, 5.0, 20.0, 20.0]);
//!
//! let mut tree = DecisionTreeRegressor::new();
//! tree.fit(&x, &y).unwrap();
//! let pred = tree.predict(&x).unwrap();
//! assert_eq!(pred.as_slice(), &[5.0, 5.0, 20.0, 20.0]);
//! ```

mod random_forest;

pub use random_forest::RandomForestRegressor;

use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Predicted value for this leaf (mean of y values)
    pub value: f32,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Samples where feature <= threshold
    pub left: Box<RegressionTreeNode>,
    /// Samples where feature > threshold
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    Node(RegressionNode),
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Leaf nodes have depth 0, internal nodes 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 1,
            RegressionTreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    /// Walks the tree for one sample.
    fn predict_row(&self, row: &[f32]) -> f32 {
        let mut node = self;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(split) => {
                    node = if row[split.feature_idx] <= split.threshold {
                        &split.left
                    } else {
                        &split.right
                    };
                }
            }
        }
    }
}

/// CART regression tree using the squared-error criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    tree: Option<RegressionTreeNode>,
    n_features: Option<usize>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeRegressor {
    /// Creates a fully grown tree (no depth limit, split down to single samples).
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            n_features: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Minimum samples a node needs before it may split (clamped to >= 2).
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Minimum samples each child must keep (clamped to >= 1).
    #[must_use]
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// The fitted tree, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&RegressionTreeNode> {
        self.tree.as_ref()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Fits on the rows named by `indices` (repeats allowed, as in a bootstrap sample).
    pub(crate) fn fit_indices(
        &mut self,
        x: &Matrix<f32>,
        y: &Vector<f32>,
        indices: &[usize],
    ) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(ProgressionError::dimension_mismatch(
                "samples vs targets",
                x.n_rows(),
                y.len(),
            ));
        }
        if indices.is_empty() {
            return Err(ProgressionError::empty_input("cannot fit a tree with zero samples"));
        }

        let builder = TreeBuilder {
            x,
            y,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };
        let mut indices = indices.to_vec();
        self.tree = Some(builder.build(&mut indices, 0));
        self.n_features = Some(x.n_cols());
        Ok(())
    }

    /// Predicts one row; the caller has already checked the width.
    pub(crate) fn predict_row(&self, row: &[f32]) -> Result<f32> {
        self.tree
            .as_ref()
            .map(|tree| tree.predict_row(row))
            .ok_or(ProgressionError::NotFitted("DecisionTreeRegressor"))
    }
}

impl Estimator for DecisionTreeRegressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let all: Vec<usize> = (0..x.n_rows()).collect();
        self.fit_indices(x, y, &all)
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let n_features = self
            .n_features
            .ok_or(ProgressionError::NotFitted("DecisionTreeRegressor"))?;
        check_width(x, n_features)?;
        (0..x.n_rows())
            .map(|i| self.predict_row(x.row_slice(i)))
            .collect()
    }
}

pub(crate) fn check_width(x: &Matrix<f32>, n_features: usize) -> Result<()> {
    if x.n_cols() != n_features {
        return Err(ProgressionError::dimension_mismatch(
            "features",
            n_features,
            x.n_cols(),
        ));
    }
    Ok(())
}

/// Best split found for one node.
struct Split {
    feature_idx: usize,
    threshold: f32,
    /// Number of samples that go left once the node's indices are sorted by the feature.
    n_left: usize,
    /// Children SSE; lower is better.
    impurity: f64,
}

struct TreeBuilder<'a> {
    x: &'a Matrix<f32>,
    y: &'a Vector<f32>,
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
}

impl TreeBuilder<'_> {
    fn build(&self, indices: &mut [usize], depth: usize) -> RegressionTreeNode {
        let n = indices.len();
        let (sum, sum_sq) = indices.iter().fold((0.0_f64, 0.0_f64), |(s, sq), &i| {
            let v = f64::from(self.y[i]);
            (s + v, sq + v * v)
        });
        let mean = sum / n as f64;
        let sse = (sum_sq - sum * sum / n as f64).max(0.0);

        let leaf = || {
            RegressionTreeNode::Leaf(RegressionLeaf {
                value: mean as f32,
                n_samples: n,
            })
        };

        let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
        if depth_reached || n < self.min_samples_split || sse <= 1e-10 {
            return leaf();
        }

        let Some(split) = self.best_split(indices, sse) else {
            return leaf();
        };

        let feature = split.feature_idx;
        indices.sort_by(|&a, &b| self.x.get(a, feature).total_cmp(&self.x.get(b, feature)));
        let (left, right) = indices.split_at_mut(split.n_left);

        RegressionTreeNode::Node(RegressionNode {
            feature_idx: feature,
            threshold: split.threshold,
            left: Box::new(self.build(left, depth + 1)),
            right: Box::new(self.build(right, depth + 1)),
        })
    }

    /// Sort-and-sweep search over every feature; `None` if no split lowers the SSE.
    fn best_split(&self, indices: &[usize], parent_sse: f64) -> Option<Split> {
        let n = indices.len();
        let total: f64 = indices.iter().map(|&i| f64::from(self.y[i])).sum();
        let total_sq: f64 = indices
            .iter()
            .map(|&i| f64::from(self.y[i]).powi(2))
            .sum();

        let mut best: Option<Split> = None;
        let mut order = indices.to_vec();

        for feature in 0..self.x.n_cols() {
            order.sort_by(|&a, &b| self.x.get(a, feature).total_cmp(&self.x.get(b, feature)));

            let mut left_sum = 0.0_f64;
            let mut left_sq = 0.0_f64;
            for k in 0..n - 1 {
                let v = f64::from(self.y[order[k]]);
                left_sum += v;
                left_sq += v * v;

                let n_left = k + 1;
                let n_right = n - n_left;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let here = self.x.get(order[k], feature);
                let next = self.x.get(order[k + 1], feature);
                if here >= next {
                    continue;
                }

                let right_sum = total - left_sum;
                let right_sq = total_sq - left_sq;
                let impurity = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    best = Some(Split {
                        feature_idx: feature,
                        threshold: midpoint(here, next),
                        n_left,
                        impurity,
                    });
                }
            }
        }

        best.filter(|b| b.impurity < parent_sse - 1e-12 * parent_sse.max(1.0))
    }
}

/// Threshold between two adjacent distinct values, always `>= low` and `< high`.
fn midpoint(low: f32, high: f32) -> f32 {
    let mid = low + (high - low) / 2.0;
    if mid < high && mid >= low {
        mid
    } else {
        low
    }
}
