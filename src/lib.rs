//! Progression: disease-progression regression on the diabetes dataset.
//!
//! The crate trains a small family of regressors on the bundled 442-patient
//! diabetes data, writes a model artifact plus a metrics document, and
//! provides the request handling used by the prediction server.
//!
//! # Quick Start
//!
//! ```
//! use progression::prelude::*;
//!
//! // y = 2*x + 1
//! let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//!
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`datasets`]: The embedded diabetes dataset
//! - [`linear_model`]: Ordinary least squares and ridge regression
//! - [`tree`]: Regression trees and random forests
//! - [`preprocessing`]: Feature standardization
//! - [`pipeline`]: Model kinds and scaler + regressor pipelines
//! - [`model_selection`]: Seeded train/test splitting
//! - [`metrics`]: Regression and thresholded classification metrics
//! - [`stats`]: Quantiles and percentiles
//! - [`format`]: Model artifact and metrics document I/O
//! - [`training`]: End-to-end training runs
//! - [`serving`]: Health and prediction request handling

pub mod datasets;
pub mod error;
pub mod format;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod serving;
pub mod stats;
pub mod training;
pub mod traits;
pub mod tree;

pub use error::{ProgressionError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer};
