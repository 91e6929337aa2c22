//! Artifact loading: the serialized classifier and scaler constants.
//!
//! Both artifacts are JSON exports from the training pipeline, loaded
//! once at process start. Any schema or ordering violation is fatal at
//! startup, never a per-request failure.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapters::logistic::LogisticModel;
use crate::domain::{FeatureScaler, FEATURE_COUNT, FEATURE_NAMES};
use crate::{CardioscopeError, Result};

/// Model parameters exported by the training pipeline (`model.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Standardization constants exported by the training pipeline
/// (`scaler.json`). Both maps are keyed by feature name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedScaler {
    pub mean: BTreeMap<String, f64>,
    pub std: BTreeMap<String, f64>,
}

/// The loaded, validated inference artifacts.
pub struct ModelBundle {
    pub classifier: LogisticModel,
    pub scaler: FeatureScaler,
}

/// Load and validate `model.json` and `scaler.json` from a directory.
///
/// # Errors
/// Returns error if either file is missing or malformed, if the model's
/// feature order differs from the canonical one, or if any constant
/// fails its sanity check.
pub fn load_bundle(model_dir: &Path) -> Result<ModelBundle> {
    let classifier = load_model(&model_dir.join("model.json"))?;
    let scaler = load_scaler(&model_dir.join("scaler.json"))?;

    tracing::info!(
        "Loaded model bundle from {:?} (n_features={})",
        model_dir,
        FEATURE_COUNT
    );

    Ok(ModelBundle { classifier, scaler })
}

fn load_model(path: &Path) -> Result<LogisticModel> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CardioscopeError::Artifact(format!("Failed to read {path:?}: {e}")))?;
    let model: ExportedModel = serde_json::from_str(&content)
        .map_err(|e| CardioscopeError::Artifact(format!("Invalid model format in {path:?}: {e}")))?;

    // The exported feature order must match the canonical one exactly;
    // a reordered export would silently pair coefficients with the
    // wrong inputs.
    if model.feature_names.len() != FEATURE_COUNT {
        return Err(CardioscopeError::Artifact(format!(
            "Model expects {} features, export has {}",
            FEATURE_COUNT,
            model.feature_names.len()
        )));
    }
    for (i, (got, expected)) in model.feature_names.iter().zip(FEATURE_NAMES).enumerate() {
        if got.as_str() != expected {
            return Err(CardioscopeError::Artifact(format!(
                "Model feature order mismatch at index {i}: got {got}, expected {expected}"
            )));
        }
    }

    if model.coefficients.len() != FEATURE_COUNT {
        return Err(CardioscopeError::Artifact(format!(
            "Coefficient count {} does not match feature count {}",
            model.coefficients.len(),
            FEATURE_COUNT
        )));
    }
    if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
        return Err(CardioscopeError::Artifact(
            "Model export contains non-finite parameters".into(),
        ));
    }

    tracing::debug!("Loaded classifier from {:?}", path);
    Ok(LogisticModel::new(model.coefficients, model.intercept))
}

fn load_scaler(path: &Path) -> Result<FeatureScaler> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CardioscopeError::Artifact(format!("Failed to read {path:?}: {e}")))?;
    let exported: ExportedScaler = serde_json::from_str(&content).map_err(|e| {
        CardioscopeError::Artifact(format!("Invalid scaler format in {path:?}: {e}"))
    })?;

    let scaler = FeatureScaler::from_keyed(&exported.mean, &exported.std)
        .map_err(|e| CardioscopeError::Artifact(format!("Invalid scaler in {path:?}: {e}")))?;

    tracing::debug!("Loaded scaler from {:?}", path);
    Ok(scaler)
}
