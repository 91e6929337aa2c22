//! Prediction service: the explicit request/response handler.
//!
//! One synchronous operation: a patient record in, a risk assessment
//! out. The classifier and standardization constants are injected at
//! construction so tests can swap in mock models; there is no
//! module-level state.

use std::sync::Arc;

use crate::domain::{FeatureScaler, PatientRecord, RiskAssessment, RiskLabel};
use crate::ports::Classifier;
use crate::{CardioscopeError, Result};

/// Service for running classifier inference on patient records.
///
/// Both the classifier and the scaler are immutable after construction
/// and safe to share; every call builds its row from scratch.
pub struct PredictorService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
    scaler: FeatureScaler,
}

impl<C> PredictorService<C>
where
    C: Classifier,
{
    /// Create a new prediction service.
    pub fn new(classifier: Arc<C>, scaler: FeatureScaler) -> Self {
        Self { classifier, scaler }
    }

    /// Run inference on one patient record.
    ///
    /// Pipeline:
    /// 1. Flatten the record into the canonical feature order
    /// 2. Standardize each feature with the preloaded constants
    /// 3. Invoke the classifier's label and probability operations
    /// 4. Report the probability of the predicted class as confidence
    ///
    /// # Errors
    /// Returns error if the classifier rejects the row. No retries; a
    /// failed call aborts the whole request.
    pub fn assess(&self, record: &PatientRecord) -> Result<RiskAssessment> {
        let raw = record.to_vec();
        let row = self
            .scaler
            .standardize(&raw)
            .map_err(CardioscopeError::Validation)?;

        let code = self.classifier.predict(&row)?;
        let proba = self.classifier.predict_proba(&row)?;

        // Confidence is the predicted class's own probability, not the
        // max over both classes.
        let confidence = proba[usize::from(code.min(1))];
        let label = RiskLabel::from_code(code);

        tracing::info!(
            "Inference complete: label={}, confidence={:.2}%",
            label,
            confidence * 100.0
        );

        Ok(RiskAssessment::new(label, confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::load_bundle;
    use crate::ports::ClassifierError;
    use std::path::Path;

    fn create_service() -> PredictorService<crate::adapters::LogisticModel> {
        let bundle = load_bundle(Path::new("models")).expect("Bundle should load for tests");
        PredictorService::new(Arc::new(bundle.classifier), bundle.scaler)
    }

    fn high_risk_record() -> PatientRecord {
        PatientRecord::from_vec(&[
            65.0, 1.0, 3.0, 180.0, 300.0, 1.0, 2.0, 100.0, 1.0, 3.5, 2.0, 3.0, 2.0,
        ])
        .expect("Should build")
    }

    fn low_risk_record() -> PatientRecord {
        PatientRecord::from_vec(&[
            30.0, 0.0, 1.0, 120.0, 180.0, 0.0, 0.0, 180.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        ])
        .expect("Should build")
    }

    #[test]
    fn test_high_risk_scenario() {
        let service = create_service();
        let assessment = service.assess(&high_risk_record()).expect("Should assess");

        assert_eq!(assessment.label, RiskLabel::High);
        assert!((0.0..=1.0).contains(&assessment.confidence));
    }

    #[test]
    fn test_low_risk_scenario() {
        let service = create_service();
        let assessment = service.assess(&low_risk_record()).expect("Should assess");

        assert_eq!(assessment.label, RiskLabel::Low);
        assert!((0.0..=1.0).contains(&assessment.confidence));
    }

    #[test]
    fn test_identical_input_yields_identical_output() {
        let service = create_service();
        let record = high_risk_record();

        let first = service.assess(&record).expect("Should assess");
        let second = service.assess(&record).expect("Should assess");

        assert_eq!(first.label, second.label);
        assert!((first.confidence - second.confidence).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_inputs_do_not_error() {
        let service = create_service();

        for age in [1.0, 120.0] {
            let mut record = low_risk_record();
            record.age = age;
            let assessment = service.assess(&record).expect("Should assess");
            assert!(assessment.label.code() <= 1);
            assert!((0.0..=1.0).contains(&assessment.confidence));
        }

        // Remaining widget extremes in one record.
        let extremes = PatientRecord::from_vec(&[
            120.0, 1.0, 3.0, 200.0, 600.0, 1.0, 2.0, 220.0, 1.0, 6.2, 3.0, 4.0, 3.0,
        ])
        .expect("Should build");
        assert!(service.assess(&extremes).is_ok());
    }

    /// Mock classifier that always predicts the negative class with a
    /// fixed probability split.
    struct FixedLowClassifier;

    impl Classifier for FixedLowClassifier {
        fn n_features(&self) -> usize {
            crate::domain::FEATURE_COUNT
        }

        fn predict(&self, _row: &[f64]) -> std::result::Result<u8, ClassifierError> {
            Ok(0)
        }

        fn predict_proba(&self, _row: &[f64]) -> std::result::Result<[f64; 2], ClassifierError> {
            Ok([0.58, 0.42])
        }
    }

    #[test]
    fn test_confidence_is_predicted_class_probability() {
        let bundle = load_bundle(Path::new("models")).expect("Bundle should load for tests");
        let service = PredictorService::new(Arc::new(FixedLowClassifier), bundle.scaler);

        let assessment = service.assess(&low_risk_record()).expect("Should assess");

        // P(class=0), not the max over both classes and not P(class=1).
        assert_eq!(assessment.label, RiskLabel::Low);
        assert!((assessment.confidence - 0.58).abs() < f64::EPSILON);
    }
}
