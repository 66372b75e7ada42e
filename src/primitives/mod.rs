//! Core compute primitives (Vector, Matrix).
//!
//! Row-major, owned storage shared by every estimator in the crate.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
