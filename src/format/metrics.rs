use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Summary of one training run, written next to the model.
///
/// The threshold fields are present only when the run binarized its
/// predictions; they are omitted from the JSON otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDocument {
    pub model_name: String,
    pub seed: u64,
    /// RMSE on the held-out split.
    pub rmse: f64,
    pub n_train: usize,
    pub n_test: usize,
    /// Feature names in model input order.
    pub features: Vec<String>,
    /// 70th percentile of the training targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_at_thresh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall_at_thresh: Option<f64>,
}

impl MetricsDocument {
    /// Pretty-printed JSON, as written to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document as pretty-printed UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Reads a document written by [`MetricsDocument::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not a valid document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
