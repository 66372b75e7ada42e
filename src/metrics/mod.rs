//! Evaluation metrics.
//!
//! Regression metrics (R², MSE, RMSE) plus binary precision/recall for
//! regression targets flagged at a threshold.

pub mod classification;

use crate::primitives::Vector;

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`); returns 0.0 when the targets are constant.
///
/// # Examples
///
/// ```
/// use progression::metrics::r_squared;
/// use progression::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// assert!(r_squared(&y_pred, &y_true) > 0.9);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn r_squared(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let y_mean = f64::from(y_true.mean());
    let ss_res = sum_squared_error(y_pred, y_true);
    let ss_tot: f64 = y_true
        .iter()
        .map(|&t| (f64::from(t) - y_mean).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return 0.0;
    }

    (1.0 - ss_res / ss_tot) as f32
}

/// Computes the Mean Squared Error (MSE).
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    (sum_squared_error(y_pred, y_true) / y_true.len() as f64) as f32
}

/// Computes the Root Mean Squared Error (RMSE).
///
/// # Examples
///
/// ```
/// use progression::metrics::rmse;
/// use progression::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[1.0, 2.0, 3.0]);
/// let y_pred = Vector::from_slice(&[2.0, 3.0, 4.0]);
/// assert!((rmse(&y_pred, &y_true) - 1.0).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn rmse(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f32 {
    mse(y_pred, y_true).sqrt()
}

// Accumulated in f64; the diabetes targets reach the hundreds.
fn sum_squared_error(y_pred: &Vector<f32>, y_true: &Vector<f32>) -> f64 {
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (f64::from(t) - f64::from(p)).powi(2))
        .sum()
}
