//! Standardization constants for the classifier's input features.
//!
//! The transform must match the one applied to the training data
//! exactly, including field order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::patient::{FEATURE_COUNT, FEATURE_NAMES};

/// Per-feature mean and standard deviation, held in canonical feature
/// order and immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl FeatureScaler {
    /// Build a scaler from name-keyed constant maps.
    ///
    /// The artifact format keys both vectors by feature name so it is
    /// order-independent on disk; this constructor re-orders the entries
    /// into canonical `FEATURE_NAMES` order and rejects anything that
    /// does not cover the feature set exactly.
    ///
    /// # Errors
    /// Returns error on missing or unknown feature names, non-finite
    /// entries, or std values that are not strictly positive.
    pub fn from_keyed(
        mean: &BTreeMap<String, f64>,
        std: &BTreeMap<String, f64>,
    ) -> Result<Self, String> {
        for key in mean.keys().chain(std.keys()) {
            if !FEATURE_NAMES.contains(&key.as_str()) {
                return Err(format!("Unknown feature name in scaler: {key}"));
            }
        }

        let mut mean_vec = Vec::with_capacity(FEATURE_COUNT);
        let mut std_vec = Vec::with_capacity(FEATURE_COUNT);

        for name in FEATURE_NAMES {
            let m = *mean
                .get(name)
                .ok_or_else(|| format!("Scaler mean missing feature: {name}"))?;
            let s = *std
                .get(name)
                .ok_or_else(|| format!("Scaler std missing feature: {name}"))?;
            mean_vec.push(m);
            std_vec.push(s);
        }

        Self::from_vectors(mean_vec, std_vec)
    }

    /// Build a scaler from vectors already in canonical feature order.
    ///
    /// # Errors
    /// Returns error on wrong length, non-finite entries, or std values
    /// that are not strictly positive.
    pub fn from_vectors(mean: Vec<f64>, std: Vec<f64>) -> Result<Self, String> {
        if mean.len() != FEATURE_COUNT || std.len() != FEATURE_COUNT {
            return Err(format!(
                "Scaler vectors must have {} entries, got mean={}, std={}",
                FEATURE_COUNT,
                mean.len(),
                std.len()
            ));
        }

        for (i, (&m, &s)) in mean.iter().zip(std.iter()).enumerate() {
            if !m.is_finite() || !s.is_finite() {
                return Err(format!(
                    "Non-finite scaler entry for feature {}",
                    FEATURE_NAMES[i]
                ));
            }
            if s <= 0.0 {
                return Err(format!(
                    "Scaler std for feature {} must be > 0, got {s}",
                    FEATURE_NAMES[i]
                ));
            }
        }

        Ok(Self { mean, std })
    }

    /// Apply the standardization transform: `(raw[i] - mean[i]) / std[i]`
    /// for each feature, in canonical order.
    ///
    /// # Errors
    /// Returns error if the input length does not match the feature count.
    pub fn standardize(&self, raw: &[f64]) -> Result<Vec<f64>, String> {
        if raw.len() != FEATURE_COUNT {
            return Err(format!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                raw.len()
            ));
        }

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(self.std.iter()))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }

    /// Mean vector in canonical feature order.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Std vector in canonical feature order.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        &self.std
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(values: [f64; FEATURE_COUNT]) -> BTreeMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .zip(values)
            .map(|(name, v)| ((*name).to_string(), v))
            .collect()
    }

    fn test_scaler() -> FeatureScaler {
        let mean = keyed([
            54.0, 0.7, 1.0, 131.0, 246.0, 0.15, 0.5, 149.0, 0.3, 1.0, 1.4, 0.7, 2.3,
        ]);
        let std = keyed([
            9.0, 0.5, 1.0, 17.5, 52.0, 0.36, 0.53, 23.0, 0.47, 1.2, 0.6, 1.0, 0.6,
        ]);
        FeatureScaler::from_keyed(&mean, &std).expect("Should build")
    }

    #[test]
    fn test_standardize_elementwise() {
        let scaler = test_scaler();
        let raw = vec![63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 3.0, 0.0, 1.0];
        let z = scaler.standardize(&raw).expect("Should standardize");

        assert_eq!(z.len(), FEATURE_COUNT);
        assert!((z[0] - (63.0 - 54.0) / 9.0).abs() < 1e-12);
        assert!((z[4] - (233.0 - 246.0) / 52.0).abs() < 1e-12);
        assert!((z[12] - (1.0 - 2.3) / 0.6).abs() < 1e-12);

        // Deterministic: same input, same output.
        assert_eq!(z, scaler.standardize(&raw).expect("Should standardize"));
    }

    #[test]
    fn test_standardize_is_field_order_sensitive() {
        let scaler = test_scaler();

        // Swap the mean/std entries for trestbps and chol.
        let mut mean = scaler.mean().to_vec();
        let mut std = scaler.std().to_vec();
        mean.swap(3, 4);
        std.swap(3, 4);
        let swapped = FeatureScaler::from_vectors(mean, std).expect("Should build");

        let raw = vec![63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 3.0, 0.0, 1.0];
        let z = scaler.standardize(&raw).expect("Should standardize");
        let z_swapped = swapped.standardize(&raw).expect("Should standardize");

        assert_ne!(z, z_swapped);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let scaler = test_scaler();
        assert!(scaler.standardize(&[1.0; 12]).is_err());
        assert!(scaler.standardize(&[1.0; 14]).is_err());
    }

    #[test]
    fn test_keyed_construction_rejects_bad_inputs() {
        let mean = keyed([0.0; FEATURE_COUNT]);
        let std = keyed([1.0; FEATURE_COUNT]);

        // Missing key.
        let mut missing = mean.clone();
        missing.remove("oldpeak");
        assert!(FeatureScaler::from_keyed(&missing, &std).is_err());

        // Unknown key.
        let mut unknown = mean.clone();
        unknown.insert("resting_bp".to_string(), 1.0);
        assert!(FeatureScaler::from_keyed(&unknown, &std).is_err());

        // Zero std.
        let mut zero_std = std.clone();
        zero_std.insert("chol".to_string(), 0.0);
        assert!(FeatureScaler::from_keyed(&mean, &zero_std).is_err());

        // Non-finite mean.
        let mut nan_mean = mean.clone();
        nan_mean.insert("age".to_string(), f64::NAN);
        assert!(FeatureScaler::from_keyed(&nan_mean, &std).is_err());
    }
}
