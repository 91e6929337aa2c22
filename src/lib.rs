//! # Cardioscope
//!
//! Terminal heart disease risk predictor.
//!
//! This crate provides:
//! - A 13-field clinical data entry form
//! - Standardization + logistic-regression inference on a pre-trained model
//! - A binary risk verdict with a confidence percentage
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, FeatureScaler, RiskAssessment)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (artifact loading, logistic model)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{PatientRecord, RiskAssessment, RiskLabel};

/// Result type for Cardioscope operations
pub type Result<T> = std::result::Result<T, CardioscopeError>;

/// Main error type for Cardioscope
#[derive(Debug, thiserror::Error)]
pub enum CardioscopeError {
    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("Inference failed: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
