//! Composed estimators selected by model kind.
//!
//! A [`Pipeline`] is an optional [`StandardScaler`] followed by one
//! regressor. It is the unit that gets trained, saved to disk and served.

use crate::error::{ProgressionError, Result};
use crate::linear_model::{LinearRegression, Ridge};
use crate::preprocessing::StandardScaler;
use crate::primitives::{Matrix, Vector};
use crate::traits::{Estimator, Transformer};
use crate::tree::RandomForestRegressor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// L2 penalty used by the `ridge` kind.
pub const RIDGE_ALPHA: f32 = 1.0;

/// Number of trees used by the `rf` kind.
pub const FOREST_N_ESTIMATORS: usize = 300;

/// The selectable estimator configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// Standard scaler, then ordinary least squares.
    Linear,
    /// Standard scaler, then ridge regression.
    Ridge,
    /// Random forest on raw features.
    RandomForest,
}

impl ModelKind {
    /// Every kind, in selector order.
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Ridge, ModelKind::RandomForest];

    /// The selector accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Ridge => "ridge",
            ModelKind::RandomForest => "rf",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ProgressionError::InvalidArgument(format!(
                    "unsupported kind '{s}'; expected one of: linear, ridge, rf"
                ))
            })
    }
}

/// The final estimator of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Regressor {
    Linear(LinearRegression),
    Ridge(Ridge),
    RandomForest(RandomForestRegressor),
}

impl Estimator for Regressor {
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        match self {
            Regressor::Linear(model) => model.fit(x, y),
            Regressor::Ridge(model) => model.fit(x, y),
            Regressor::RandomForest(model) => model.fit(x, y),
        }
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        match self {
            Regressor::Linear(model) => model.predict(x),
            Regressor::Ridge(model) => model.predict(x),
            Regressor::RandomForest(model) => model.predict(x),
        }
    }
}

/// Optional scaling followed by a regressor.
///
/// # Examples
///
/// ```
/// use progression::pipeline::{ModelKind, Pipeline};
/// use progression::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut pipeline = Pipeline::for_kind(ModelKind::Linear, 42);
/// pipeline.fit(&x, &y).unwrap();
/// assert_eq!(pipeline.name(), "StandardScaler+LinearRegression");
/// assert!((pipeline.predict(&x).unwrap()[3] - 9.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    scaler: Option<StandardScaler>,
    regressor: Regressor,
}

impl Pipeline {
    /// Builds the unfitted pipeline for `kind`; `seed` drives any randomness.
    #[must_use]
    pub fn for_kind(kind: ModelKind, seed: u64) -> Self {
        match kind {
            ModelKind::Linear => Self {
                scaler: Some(StandardScaler::new()),
                regressor: Regressor::Linear(LinearRegression::new()),
            },
            ModelKind::Ridge => Self {
                scaler: Some(StandardScaler::new()),
                regressor: Regressor::Ridge(Ridge::new(RIDGE_ALPHA)),
            },
            ModelKind::RandomForest => Self {
                scaler: None,
                regressor: Regressor::RandomForest(
                    RandomForestRegressor::new(FOREST_N_ESTIMATORS).with_random_state(seed),
                ),
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self.regressor {
            Regressor::Linear(_) => ModelKind::Linear,
            Regressor::Ridge(_) => ModelKind::Ridge,
            Regressor::RandomForest(_) => ModelKind::RandomForest,
        }
    }

    /// Human-readable description recorded in the metrics document.
    #[must_use]
    pub fn name(&self) -> String {
        let regressor = match &self.regressor {
            Regressor::Linear(_) => "LinearRegression".to_string(),
            Regressor::Ridge(model) => format!("Ridge(alpha={:.1})", model.alpha()),
            Regressor::RandomForest(model) => {
                format!("RandomForestRegressor(n_estimators={})", model.n_estimators())
            }
        };
        match self.scaler {
            Some(_) => format!("StandardScaler+{regressor}"),
            None => regressor,
        }
    }

    #[must_use]
    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }

    #[must_use]
    pub fn scaler(&self) -> Option<&StandardScaler> {
        self.scaler.as_ref()
    }
}

impl Estimator for Pipeline {
    /// Fits the scaler (if any) on `x`, then the regressor on the scaled data.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        match &mut self.scaler {
            Some(scaler) => {
                let scaled = scaler.fit_transform(x)?;
                self.regressor.fit(&scaled, y)
            }
            None => self.regressor.fit(x, y),
        }
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        match &self.scaler {
            Some(scaler) => self.regressor.predict(&scaler.transform(x)?),
            None => self.regressor.predict(x),
        }
    }
}
