//! Descriptive statistics over target vectors.
//!
//! Quantiles use the R-7 definition (linear interpolation between order
//! statistics), the default of R, `NumPy` and Pandas.

use crate::error::{ProgressionError, Result};
use crate::primitives::Vector;

/// Read-only statistics over a borrowed vector.
///
/// # Examples
///
/// ```
/// use progression::primitives::Vector;
/// use progression::stats::DescriptiveStats;
///
/// let data = Vector::from_slice(&[1.0_f32, 2.0, 3.0, 4.0, 5.0]);
/// let stats = DescriptiveStats::new(&data);
/// assert_eq!(stats.quantile(0.5).unwrap(), 3.0);
/// assert_eq!(stats.percentile(25.0).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DescriptiveStats<'a> {
    data: &'a Vector<f32>,
}

impl<'a> DescriptiveStats<'a> {
    #[must_use]
    pub fn new(data: &'a Vector<f32>) -> Self {
        Self { data }
    }

    /// Interpolated quantile for `q` in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, contains NaN, or `q` is outside [0, 1].
    pub fn quantile(&self, q: f64) -> Result<f32> {
        if self.data.is_empty() {
            return Err(ProgressionError::empty_input("quantile of empty vector"));
        }
        if !(0.0..=1.0).contains(&q) {
            return Err(ProgressionError::InvalidHyperparameter {
                param: "q".to_string(),
                value: q.to_string(),
                constraint: "a value in [0, 1]".to_string(),
            });
        }
        if self.data.iter().any(|v| v.is_nan()) {
            return Err(ProgressionError::Other(
                "Cannot compute quantile of data containing NaN".to_string(),
            ));
        }

        let mut sorted = self.data.as_slice().to_vec();
        sorted.sort_by(f32::total_cmp);

        // h = (n - 1) * q, 0-indexed position in the sorted data
        let h = (sorted.len() - 1) as f64 * q;
        let lo = h.floor() as usize;
        let hi = h.ceil() as usize;
        if lo == hi {
            return Ok(sorted[lo]);
        }

        let frac = h - lo as f64;
        let lower = f64::from(sorted[lo]);
        let upper = f64::from(sorted[hi]);
        Ok((lower + frac * (upper - lower)) as f32)
    }

    /// Percentile for `p` in [0, 100].
    ///
    /// # Errors
    ///
    /// Same conditions as [`DescriptiveStats::quantile`].
    pub fn percentile(&self, p: f64) -> Result<f32> {
        self.quantile(p / 100.0)
    }
}
