//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! one use case of the application: submit a record, get a verdict.

mod predictor;

pub use predictor::PredictorService;
