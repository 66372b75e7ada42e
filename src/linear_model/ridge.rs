use super::{check_training_data, predict_linear, solve_normal_equations};
use crate::error::{ProgressionError, Result};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Ridge regression (L2-regularized least squares).
///
/// Minimizes `||y - Xβ||² + α||β||²`. The intercept is not penalized, so
/// centred data gives the same intercept as OLS.
///
/// # Examples
///
/// ```
/// use progression::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut ridge = Ridge::new(1.0);
/// ridge.fit(&x, &y).unwrap();
/// // Shrunk toward zero compared to the OLS slope of 2.0
/// assert!(ridge.coefficients().unwrap()[0] < 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    /// Regularization strength.
    alpha: f32,
    coefficients: Option<Vector<f32>>,
    intercept: f32,
    fit_intercept: bool,
}

impl Ridge {
    /// Creates a ridge model with regularization strength `alpha`.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
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

    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
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

impl Estimator for Ridge {
    /// Fits the model using regularized normal equations: β = (XᵀX + αI)⁻¹ Xᵀy.
    ///
    /// # Errors
    ///
    /// Returns an error if `alpha` is negative or not finite, the inputs
    /// disagree in length, or the system cannot be solved.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(ProgressionError::InvalidHyperparameter {
                param: "alpha".to_string(),
                value: self.alpha.to_string(),
                constraint: "a finite value >= 0".to_string(),
            });
        }
        check_training_data(x, y)?;

        let (intercept, coefficients) =
            solve_normal_equations(x, y, self.fit_intercept, self.alpha)?;
        self.intercept = intercept;
        self.coefficients = Some(coefficients);
        Ok(())
    }

    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(ProgressionError::NotFitted("Ridge"))?;
        predict_linear(x, coefficients, self.intercept)
    }
}
