//! Linear models for regression.
//!
//! Both models solve the normal equations with a Cholesky factorization:
//! `LinearRegression` as ordinary least squares and [`Ridge`] with an L2
//! penalty added to the diagonal.

mod ridge;

pub use ridge::Ridge;

use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets. The model equation is:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Examples
///
/// ```
/// use progression::prelude::*;
///
/// // y = 2*x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let pred = model.predict(&x).unwrap();
/// assert!((pred[0] - 3.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` that fits an intercept.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fitted coefficients, if any.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f32>> {
        self.coefficients.as_ref()
    }

    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Estimator for LinearRegression {
    /// Fits the model using normal equations: β = (XᵀX)⁻¹ Xᵀy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input dimensions don't match
    /// - There are fewer samples than parameters
    /// - `XᵀX` is not positive definite (collinear features)
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        check_training_data(x, y)?;

        let (n_samples, n_features) = x.shape();
        let required = n_features + usize::from(self.fit_intercept);
        if n_samples < required {
            return Err(ProgressionError::InvalidArgument(format!(
                "LinearRegression needs at least {required} samples for {n_features} features, got \
                 {n_samples}; consider Ridge"
            )));
        }

        let (intercept, coefficients) = solve_normal_equations(x, y, self.fit_intercept, 0.0)?;
        self.intercept = intercept;
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(ProgressionError::NotFitted("LinearRegression"))?;
        predict_linear(x, coefficients, self.intercept)
    }
}

fn check_training_data(x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(ProgressionError::dimension_mismatch(
            "samples vs targets",
            x.n_rows(),
            y.len(),
        ));
    }
    if x.n_rows() == 0 {
        return Err(ProgressionError::empty_input("cannot fit with zero samples"));
    }
    Ok(())
}

/// Adds an intercept column of ones to the design matrix.
fn add_intercept_column(x: &Matrix<f32>) -> Result<Matrix<f32>> {
    let (n_rows, n_cols) = x.shape();
    let mut data = Vec::with_capacity(n_rows * (n_cols + 1));
    for i in 0..n_rows {
        data.push(1.0);
        data.extend_from_slice(x.row_slice(i));
    }
    Matrix::from_vec(n_rows, n_cols + 1, data)
}

/// Solves (XᵀX + αI)β = Xᵀy and splits β into (intercept, coefficients).
///
/// The intercept is never penalized.
fn solve_normal_equations(
    x: &Matrix<f32>,
    y: &Vector<f32>,
    fit_intercept: bool,
    alpha: f32,
) -> Result<(f32, Vector<f32>)> {
    let x_design = if fit_intercept {
        add_intercept_column(x)?
    } else {
        x.clone()
    };

    let xt = x_design.transpose();
    let mut xtx = xt.matmul(&x_design)?;
    if alpha > 0.0 {
        let first_penalized = usize::from(fit_intercept);
        for i in first_penalized..xtx.n_rows() {
            xtx.set(i, i, xtx.get(i, i) + alpha);
        }
    }
    let xty = xt.matvec(y)?;

    let beta = xtx.cholesky_solve(&xty)?;
    if fit_intercept {
        let coefficients = Vector::from_slice(&beta.as_slice()[1..]);
        Ok((beta[0], coefficients))
    } else {
        Ok((0.0, beta))
    }
}

fn predict_linear(x: &Matrix<f32>, coefficients: &Vector<f32>, intercept: f32) -> Result<Vector<f32>> {
    if x.n_cols() != coefficients.len() {
        return Err(ProgressionError::dimension_mismatch(
            "features",
            coefficients.len(),
            x.n_cols(),
        ));
    }
    Ok(x.matvec(coefficients)?.add_scalar(intercept))
}
