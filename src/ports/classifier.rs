//! Classifier port: Trait for the pre-trained binary classifier.
//!
//! This trait abstracts the model implementation from the application
//! logic, so the prediction service can be tested with mock models.

/// Errors produced by classifier implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature count mismatch: got {got}, expected {expected}")]
    FeatureCount { got: usize, expected: usize },

    #[error("Non-finite feature value at index {0}")]
    NonFinite(usize),
}

/// Trait for binary classification on a single normalized feature row.
///
/// Implementations wrap a model trained and serialized elsewhere; this
/// crate only invokes it.
pub trait Classifier: Send + Sync {
    /// Number of features the model expects per row.
    fn n_features(&self) -> usize;

    /// Predict the class label for one row.
    ///
    /// # Returns
    /// 0 (negative class) or 1 (positive class).
    ///
    /// # Errors
    /// Returns error if the row has the wrong length or non-finite values.
    fn predict(&self, row: &[f64]) -> Result<u8, ClassifierError>;

    /// Predict class probabilities for one row.
    ///
    /// # Returns
    /// `[P(class=0), P(class=1)]`, summing to 1.
    ///
    /// # Errors
    /// Returns error if the row has the wrong length or non-finite values.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], ClassifierError>;
}
