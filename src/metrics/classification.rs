//! Binary classification metrics for thresholded regression output.
//!
//! A regression target becomes a flag when it reaches a threshold; precision
//! and recall then measure how well the predicted flags match the true ones.
//! Zero denominators score 0.0 instead of panicking.

/// Flags every value that is at or above `threshold`.
///
/// # Examples
///
/// ```
/// use progression::metrics::classification::binarize;
///
/// assert_eq!(binarize(&[1.0, 2.0, 3.0], 2.0), vec![false, true, true]);
/// ```
#[must_use]
pub fn binarize(values: &[f32], threshold: f32) -> Vec<bool> {
    values.iter().map(|&v| v >= threshold).collect()
}

/// Counts of a binary confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryConfusion {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl BinaryConfusion {
    /// Tallies predicted against true flags.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    #[must_use]
    pub fn from_flags(y_pred: &[bool], y_true: &[bool]) -> Self {
        assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
        let mut counts = Self::default();
        for (&p, &t) in y_pred.iter().zip(y_true) {
            match (p, t) {
                (true, true) => counts.true_positives += 1,
                (true, false) => counts.false_positives += 1,
                (false, true) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts
    }

    /// TP / (TP + FP), or 0.0 when nothing was flagged.
    #[must_use]
    pub fn precision(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN), or 0.0 when nothing should have been flagged.
    #[must_use]
    pub fn recall(&self) -> f32 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

fn ratio(num: usize, den: usize) -> f32 {
    if den == 0 {
        0.0
    } else {
        num as f32 / den as f32
    }
}

/// Precision of predicted flags.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn precision(y_pred: &[bool], y_true: &[bool]) -> f32 {
    BinaryConfusion::from_flags(y_pred, y_true).precision()
}

/// Recall of predicted flags.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn recall(y_pred: &[bool], y_true: &[bool]) -> f32 {
    BinaryConfusion::from_flags(y_pred, y_true).recall()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binarize_is_inclusive() {
        assert_eq!(binarize(&[0.9, 1.0, 1.1], 1.0), vec![false, true, true]);
    }

    #[test]
    fn test_confusion_counts() {
        let y_true = [true, true, false, false, true];
        let y_pred = [true, false, true, false, true];
        let c = BinaryConfusion::from_flags(&y_pred, &y_true);
        assert_eq!(c.true_positives, 2);
        assert_eq!(c.false_positives, 1);
        assert_eq!(c.false_negatives, 1);
        assert_eq!(c.true_negatives, 1);
        assert!((c.precision() - 2.0 / 3.0).abs() < 1e-6);
        assert!((c.recall() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_division_is_zero() {
        let none = [false, false];
        let some = [true, false];
        assert_eq!(precision(&none, &some), 0.0);
        assert_eq!(recall(&some, &none), 0.0);
    }

    #[test]
    fn test_perfect_flags() {
        let flags = [true, false, true];
        assert_eq!(precision(&flags, &flags), 1.0);
        assert_eq!(recall(&flags, &flags), 1.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn test_length_mismatch_panics() {
        let _ = precision(&[true], &[true, false]);
    }
}
