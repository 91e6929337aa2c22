//! Adapters layer: Concrete implementations of the ports.
//!
//! - `artifact`: loads the serialized model and scaler from disk
//! - `logistic`: logistic-regression implementation of `Classifier`
//! - `sanitize`: PHI-redacting log writer

pub mod artifact;
pub mod logistic;
pub mod sanitize;

pub use artifact::{load_bundle, ModelBundle};
pub use logistic::LogisticModel;
pub use sanitize::SanitizingMakeWriter;
