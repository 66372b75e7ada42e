//! Preprocessing transformers.
//!
//! # Example
//!
//! ```
//! use progression::prelude::*;
//! use progression::preprocessing::StandardScaler;
//!
//! let data = Matrix::from_vec(4, 2, vec![
//!     1.0, 100.0,
//!     2.0, 200.0,
//!     3.0, 300.0,
//!     4.0, 400.0,
//! ]).unwrap();
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&data).unwrap();
//!
//! let col_mean: f32 = (0..4).map(|i| scaled.get(i, 0)).sum::<f32>() / 4.0;
//! assert!(col_mean.abs() < 1e-5);
//! ```

use crate::error::{ProgressionError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Standardizes features to zero mean and unit (population) variance.
///
/// Constant columns are centered but left unscaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
    with_mean: bool,
    with_std: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a scaler that both centers and scales.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            with_mean: true,
            with_std: true,
        }
    }

    /// Sets whether to center the data by subtracting the mean.
    #[must_use]
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    /// Sets whether to scale the data by dividing by standard deviation.
    #[must_use]
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }

    /// Per-feature means, if fitted.
    #[must_use]
    pub fn mean(&self) -> Option<&[f32]> {
        self.mean.as_deref()
    }

    /// Per-feature standard deviations, if fitted.
    #[must_use]
    pub fn std(&self) -> Option<&[f32]> {
        self.std.as_deref()
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Number of features seen during fit.
    #[must_use]
    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(Vec::len)
    }
}

impl Transformer for StandardScaler {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err(ProgressionError::empty_input("StandardScaler::fit"));
        }

        let n = n_samples as f64;
        let mut mean = vec![0.0_f64; n_features];
        for i in 0..n_samples {
            for (j, m) in mean.iter_mut().enumerate() {
                *m += f64::from(x.get(i, j));
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0_f64; n_features];
        for i in 0..n_samples {
            for (j, v) in var.iter_mut().enumerate() {
                let d = f64::from(x.get(i, j)) - mean[j];
                *v += d * d;
            }
        }

        self.mean = Some(mean.iter().map(|&m| m as f32).collect());
        self.std = Some(var.iter().map(|&v| (v / n).sqrt() as f32).collect());
        Ok(())
    }

    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (mean, std) = match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => (mean, std),
            _ => return Err(ProgressionError::NotFitted("StandardScaler")),
        };

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(ProgressionError::dimension_mismatch(
                "StandardScaler features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = Vec::with_capacity(n_samples * n_features);
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j);
                if self.with_mean {
                    val -= mean[j];
                }
                if self.with_std && std[j] > 1e-10 {
                    val /= std[j];
                }
                result.push(val);
            }
        }

        Matrix::from_vec(n_samples, n_features, result)
    }
}
