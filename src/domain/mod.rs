//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external dependencies
//! beyond serde. All types are serializable and validated at the edges.

mod assessment;
mod patient;
mod scaler;

pub use assessment::{RiskAssessment, RiskLabel};
pub use patient::{
    ChestPainType, PatientRecord, RestingEcg, Sex, StSlope, ThalStatus, FEATURE_COUNT,
    FEATURE_NAMES,
};
pub use scaler::FeatureScaler;
