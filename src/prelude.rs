//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use progression::prelude::*;
//! ```

pub use crate::linear_model::{LinearRegression, Ridge};
pub use crate::metrics::{mse, r_squared, rmse};
pub use crate::pipeline::{ModelKind, Pipeline};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::{Estimator, Transformer};
pub use crate::tree::{DecisionTreeRegressor, RandomForestRegressor};
