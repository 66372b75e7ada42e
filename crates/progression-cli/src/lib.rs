//! progression-cli - training and serving front ends
//!
//! Two binaries share this library:
//!
//!   progression-train --out_dir models --kind ridge   # fit and write artifacts
//!   progression-serve --model-dir models --port 8000  # HTTP prediction server

pub mod commands;
pub mod error;
pub mod logging;

pub use error::{CliError, Result};
