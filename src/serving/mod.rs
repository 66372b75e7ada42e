//! Request handling shared by any transport.
//!
//! A [`ServiceContext`] is built once at startup from an artifact directory
//! and is read-only afterwards, so it can be shared across request handlers
//! behind an `Arc` without locking.

use crate::error::{ProgressionError, Result};
use crate::format::{load_model, ArtifactPaths};
use crate::pipeline::Pipeline;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Version reported by the health endpoint.
pub const MODEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reported when the metrics document is absent or has no model name.
pub const UNKNOWN_MODEL_NAME: &str = "unknown";

/// Anything that maps a feature matrix to one prediction per row.
pub trait Predictor: Send + Sync {
    /// Predicts every row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` cannot be scored (wrong width, unfitted model).
    fn predict_rows(&self, x: &Matrix<f32>) -> Result<Vector<f32>>;
}

impl Predictor for Pipeline {
    fn predict_rows(&self, x: &Matrix<f32>) -> Result<Vector<f32>> {
        self.predict(x)
    }
}

/// One patient's ten baseline measurements.
///
/// Every field is required. A field may be a JSON number or a string holding
/// one (`"0.06"`); anything else is rejected. Unknown fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(deserialize_with = "lax_f64")]
    pub age: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub sex: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub bmi: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub bp: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s1: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s2: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s3: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s4: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s5: f64,
    #[serde(deserialize_with = "lax_f64")]
    pub s6: f64,
}

/// Accepts a JSON number or a numeric string.
fn lax_f64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    struct LaxF64;

    impl Visitor<'_> for LaxF64 {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<f64, E> {
            Ok(v)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<f64, E> {
            Ok(v as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LaxF64)
}

impl FeatureVector {
    /// Parses and validates a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Validation`] for malformed JSON, a non-object
    /// body, a missing field, or a field that is neither a number nor a
    /// numeric string.
    pub fn from_json(body: &[u8]) -> std::result::Result<Self, ServeError> {
        serde_json::from_slice(body).map_err(|e| ServeError::Validation {
            message: e.to_string(),
        })
    }

    /// Values in model input order (`age`, `sex`, `bmi`, `bp`, `s1`..`s6`).
    #[must_use]
    pub fn as_row(&self) -> [f64; 10] {
        [
            self.age, self.sex, self.bmi, self.bp, self.s1, self.s2, self.s3, self.s4, self.s5,
            self.s6,
        ]
    }

    /// A 1 x 10 matrix ready for a [`Predictor`].
    #[must_use]
    pub fn to_matrix(&self) -> Matrix<f32> {
        let mut m = Matrix::zeros(1, 10);
        for (j, v) in self.as_row().into_iter().enumerate() {
            m.set(0, j, v as f32);
        }
        m
    }
}

/// Request-scoped failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServeError {
    /// The request body is not a valid feature vector.
    #[error("{message}")]
    Validation { message: String },
    /// The model could not score a valid request.
    #[error("{message}")]
    PredictionFailed { message: String },
}

impl ServeError {
    /// Tag used in the `error` field of the response body.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ServeError::Validation { .. } => "validation_error",
            ServeError::PredictionFailed { .. } => "prediction_failed",
        }
    }

    /// HTTP status code for this failure.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ServeError::Validation { .. } => 422,
            ServeError::PredictionFailed { .. } => 400,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ServeError::Validation { message } | ServeError::PredictionFailed { message } => {
                message
            }
        }
    }

    /// The JSON body sent to the client.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code().to_string(),
            detail: ErrorDetail {
                message: self.message().to_string(),
            },
        }
    }
}

/// `{"error": ..., "detail": {"message": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_version: String,
    pub model_name: String,
    pub rmse: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

/// The parts of `metrics.json` the server reports.
///
/// Read leniently: missing keys become `None` and extra keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub rmse: Option<f64>,
}

impl MetricsSummary {
    /// Reads `path`; a missing file yields an empty summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "metrics document not found, starting with empty metrics");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Everything a request handler needs, fixed at startup.
#[derive(Clone)]
pub struct ServiceContext {
    predictor: Arc<dyn Predictor>,
    metrics: MetricsSummary,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl ServiceContext {
    #[must_use]
    pub fn new(predictor: Arc<dyn Predictor>, metrics: MetricsSummary) -> Self {
        Self { predictor, metrics }
    }

    /// Loads `model.pkl` and (optionally) `metrics.json` from `model_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is missing or corrupt, or if a metrics
    /// document exists but is malformed.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        let paths = ArtifactPaths::new(model_dir);
        if !paths.model.is_file() {
            return Err(ProgressionError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("model artifact not found at {}", paths.model.display()),
            )));
        }

        let pipeline = load_model(&paths.model)?;
        let metrics = MetricsSummary::load_or_empty(&paths.metrics)?;
        info!(
            model = %paths.model.display(),
            kind = %pipeline.kind(),
            model_name = metrics.model_name.as_deref().unwrap_or(UNKNOWN_MODEL_NAME),
            "loaded model artifacts"
        );
        Ok(Self::new(Arc::new(pipeline), metrics))
    }

    #[must_use]
    pub fn metrics(&self) -> &MetricsSummary {
        &self.metrics
    }

    /// Liveness plus the metrics recorded at training time. Never fails.
    #[must_use]
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            model_version: MODEL_VERSION.to_string(),
            model_name: self
                .metrics
                .model_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_MODEL_NAME.to_string()),
            rmse: self.metrics.rmse,
        }
    }

    /// Validates a raw JSON body and scores it.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::Validation`] before touching the model if the
    /// body is invalid, and [`ServeError::PredictionFailed`] if inference
    /// fails.
    pub fn predict_json(&self, body: &[u8]) -> std::result::Result<PredictionResponse, ServeError> {
        let features = FeatureVector::from_json(body)?;
        self.predict(&features)
    }

    /// Scores one validated feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ServeError::PredictionFailed`] if the model errors, returns
    /// no output, or returns a non-finite value.
    pub fn predict(
        &self,
        features: &FeatureVector,
    ) -> std::result::Result<PredictionResponse, ServeError> {
        let output = self
            .predictor
            .predict_rows(&features.to_matrix())
            .map_err(|e| ServeError::PredictionFailed {
                message: e.to_string(),
            })?;

        let value = output
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ServeError::PredictionFailed {
                message: "model returned no prediction".to_string(),
            })?;
        if !value.is_finite() {
            return Err(ServeError::PredictionFailed {
                message: format!("model produced a non-finite prediction ({value})"),
            });
        }

        Ok(PredictionResponse {
            prediction: f64::from(value),
        })
    }
}
