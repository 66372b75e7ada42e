//! Core traits for estimators and transformers.
//!
//! `fit`/`predict`/`transform` follow sklearn conventions. Prediction is
//! fallible because a loaded model can be handed input of the wrong width.

use crate::error::Result;
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised regressors.
///
/// # Examples
///
/// ```
/// use progression::prelude::*;
///
/// // y = 2x + 1
/// let x_train = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y_train = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x_train, &y_train).unwrap();
///
/// let x_test = Matrix::from_vec(2, 1, vec![5.0, 6.0]).unwrap();
/// let y_test = Vector::from_slice(&[11.0, 13.0]);
/// assert!(model.score(&x_test, &y_test).unwrap() > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular matrix, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong
    /// number of columns.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;

    /// Coefficient of determination (R²) on the given data.
    ///
    /// # Errors
    ///
    /// Propagates prediction errors.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<f32> {
        let y_pred = self.predict(x)?;
        Ok(r_squared(&y_pred, y))
    }
}

/// Trait for data transformers (scalers).
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted or widths differ.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgressionError;

    /// Predicts the row sum; fitting only records the width.
    struct RowSum {
        n_features: Option<usize>,
    }

    impl Estimator for RowSum {
        fn fit(&mut self, x: &Matrix<f32>, _y: &Vector<f32>) -> Result<()> {
            self.n_features = Some(x.n_cols());
            Ok(())
        }

        fn predict(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
            let n = self.n_features.ok_or(ProgressionError::NotFitted("RowSum"))?;
            if x.n_cols() != n {
                return Err(ProgressionError::dimension_mismatch("features", n, x.n_cols()));
            }
            Ok((0..x.n_rows()).map(|i| x.row_slice(i).iter().sum()).collect())
        }
    }

    struct Doubler {
        fitted: bool,
    }

    impl Transformer for Doubler {
        fn fit(&mut self, _x: &Matrix<f32>) -> Result<()> {
            self.fitted = true;
            Ok(())
        }

        fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
            if !self.fitted {
                return Err(ProgressionError::NotFitted("Doubler"));
            }
            Matrix::from_vec(
                x.n_rows(),
                x.n_cols(),
                x.as_slice().iter().map(|v| v * 2.0).collect(),
            )
        }
    }

    #[test]
    fn test_default_score_uses_predict() {
        let x = Matrix::from_vec(3, 2, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]).unwrap();
        let y = Vector::from_slice(&[2.0, 4.0, 6.0]);
        let mut model = RowSum { n_features: None };
        assert!(matches!(
            model.predict(&x),
            Err(ProgressionError::NotFitted(_))
        ));
        model.fit(&x, &y).unwrap();
        assert!((model.score(&x, &y).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_propagates_width_error() {
        let x = Matrix::from_vec(1, 2, vec![1.0, 1.0]).unwrap();
        let mut model = RowSum { n_features: None };
        model.fit(&x, &Vector::from_slice(&[2.0])).unwrap();
        let wide = Matrix::from_vec(1, 3, vec![1.0, 1.0, 1.0]).unwrap();
        assert!(model.score(&wide, &Vector::from_slice(&[3.0])).is_err());
    }

    #[test]
    fn test_fit_transform_default() {
        let x = Matrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
        let mut t = Doubler { fitted: false };
        assert!(t.transform(&x).is_err());
        let out = t.fit_transform(&x).unwrap();
        assert_eq!(out.as_slice(), &[2.0, 4.0]);
    }
}
