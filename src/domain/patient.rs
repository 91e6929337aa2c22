//! Patient record types for heart disease risk prediction.
//!
//! Field set and categorical encodings match the Cleveland-style heart
//! disease dataset the classifier was trained on.

use serde::{Deserialize, Serialize};

/// Number of clinical features fed to the classifier.
pub const FEATURE_COUNT: usize = 13;

/// Feature names in the exact order the training pipeline used.
/// Order: age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
/// oldpeak, slope, ca, thal
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Biological sex (sex: Male=1, Female=0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const VARIANTS: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Female => 0,
            Self::Male => 1,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Female => "Female",
            Self::Male => "Male",
        }
    }
}

/// Chest pain category (cp: 0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl ChestPainType {
    pub const VARIANTS: [Self; 4] = [
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginalPain,
        Self::Asymptomatic,
    ];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::TypicalAngina => 0,
            Self::AtypicalAngina => 1,
            Self::NonAnginalPain => 2,
            Self::Asymptomatic => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "Typical Angina",
            Self::AtypicalAngina => "Atypical Angina",
            Self::NonAnginalPain => "Non-anginal Pain",
            Self::Asymptomatic => "Asymptomatic",
        }
    }
}

/// Resting electrocardiogram result (restecg: 0-2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestingEcg {
    Normal,
    SttAbnormality,
    LvHypertrophy,
}

impl RestingEcg {
    pub const VARIANTS: [Self; 3] = [Self::Normal, Self::SttAbnormality, Self::LvHypertrophy];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::SttAbnormality => 1,
            Self::LvHypertrophy => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::SttAbnormality => "ST-T Abnormality",
            Self::LvHypertrophy => "Left Ventricular Hypertrophy",
        }
    }
}

/// Slope of the peak-exercise ST segment (slope: 1-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StSlope {
    Upsloping,
    Flat,
    Downsloping,
}

impl StSlope {
    pub const VARIANTS: [Self; 3] = [Self::Upsloping, Self::Flat, Self::Downsloping];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Upsloping => 1,
            Self::Flat => 2,
            Self::Downsloping => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Upsloping => "Upsloping",
            Self::Flat => "Flat",
            Self::Downsloping => "Downsloping",
        }
    }
}

/// Thalassemia test result (thal: 1-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThalStatus {
    Normal,
    FixedDefect,
    ReversibleDefect,
}

impl ThalStatus {
    pub const VARIANTS: [Self; 3] = [Self::Normal, Self::FixedDefect, Self::ReversibleDefect];

    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::FixedDefect => 2,
            Self::ReversibleDefect => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::FixedDefect => "Fixed Defect",
            Self::ReversibleDefect => "Reversible Defect",
        }
    }
}

/// One patient record, created fresh per submission.
///
/// Categorical selections are mapped to their integer codes at input
/// time, so every field is stored as the numeric value the classifier
/// was trained on. The record is never mutated after creation and is
/// discarded once the result has been rendered.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PatientRecord {
    /// Age in years (1-120)
    pub age: f64,

    /// Sex: Male=1, Female=0
    pub sex: f64,

    /// Chest pain category (0-3)
    pub cp: f64,

    /// Resting blood pressure in mmHg (90-200)
    pub trestbps: f64,

    /// Serum cholesterol in mg/dL (100-600)
    pub chol: f64,

    /// Fasting blood sugar > 120 mg/dl: True=1, False=0
    pub fbs: f64,

    /// Resting ECG category (0-2)
    pub restecg: f64,

    /// Maximum heart rate achieved (70-220)
    pub thalach: f64,

    /// Exercise-induced angina: Yes=1, No=0
    pub exang: f64,

    /// ST depression induced by exercise (0.0-6.2)
    pub oldpeak: f64,

    /// ST segment slope category (1-3)
    pub slope: f64,

    /// Number of major vessels colored by fluoroscopy (0-4)
    pub ca: f64,

    /// Thalassemia category (1-3)
    pub thal: f64,
}

impl PatientRecord {
    /// Convert the record to a feature vector for inference.
    /// Order matches `FEATURE_NAMES`; the classifier depends on it.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    /// Create a record from a feature vector in `FEATURE_NAMES` order.
    ///
    /// # Errors
    /// Returns error if vector length is not 13.
    pub fn from_vec(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!(
                "Expected {} features, got {}",
                FEATURE_COUNT,
                v.len()
            ));
        }

        Ok(Self {
            age: v[0],
            sex: v[1],
            cp: v[2],
            trestbps: v[3],
            chol: v[4],
            fbs: v[5],
            restecg: v[6],
            thalach: v[7],
            exang: v[8],
            oldpeak: v[9],
            slope: v[10],
            ca: v[11],
            thal: v[12],
        })
    }

    /// Validate that all fields are within the ranges the input widgets
    /// enforce.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(1.0..=120.0).contains(&self.age) {
            errors.push(format!("Age {} out of range [1, 120]", self.age));
        }
        if self.sex != 0.0 && self.sex != 1.0 {
            errors.push(format!("Sex {} must be 0 or 1", self.sex));
        }
        if !(0.0..=3.0).contains(&self.cp) {
            errors.push(format!("Chest pain type {} out of range [0, 3]", self.cp));
        }
        if !(90.0..=200.0).contains(&self.trestbps) {
            errors.push(format!(
                "Resting BP {} out of range [90, 200]",
                self.trestbps
            ));
        }
        if !(100.0..=600.0).contains(&self.chol) {
            errors.push(format!("Cholesterol {} out of range [100, 600]", self.chol));
        }
        if self.fbs != 0.0 && self.fbs != 1.0 {
            errors.push(format!("Fasting blood sugar {} must be 0 or 1", self.fbs));
        }
        if !(0.0..=2.0).contains(&self.restecg) {
            errors.push(format!("Resting ECG {} out of range [0, 2]", self.restecg));
        }
        if !(70.0..=220.0).contains(&self.thalach) {
            errors.push(format!(
                "Max heart rate {} out of range [70, 220]",
                self.thalach
            ));
        }
        if self.exang != 0.0 && self.exang != 1.0 {
            errors.push(format!("Exercise angina {} must be 0 or 1", self.exang));
        }
        if !(0.0..=6.2).contains(&self.oldpeak) {
            errors.push(format!(
                "ST depression {} out of range [0.0, 6.2]",
                self.oldpeak
            ));
        }
        if !(1.0..=3.0).contains(&self.slope) {
            errors.push(format!("ST slope {} out of range [1, 3]", self.slope));
        }
        if !(0.0..=4.0).contains(&self.ca) {
            errors.push(format!("Major vessel count {} out of range [0, 4]", self.ca));
        }
        if !(1.0..=3.0).contains(&self.thal) {
            errors.push(format!("Thalassemia {} out of range [1, 3]", self.thal));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typical_record() -> PatientRecord {
        PatientRecord {
            age: 55.0,
            sex: Sex::Male.code().into(),
            cp: ChestPainType::NonAnginalPain.code().into(),
            trestbps: 138.0,
            chol: 240.0,
            fbs: 0.0,
            restecg: RestingEcg::Normal.code().into(),
            thalach: 152.0,
            exang: 0.0,
            oldpeak: 1.2,
            slope: StSlope::Flat.code().into(),
            ca: 1.0,
            thal: ThalStatus::FixedDefect.code().into(),
        }
    }

    #[test]
    fn test_to_vec_preserves_field_order() {
        let vec = typical_record().to_vec();
        assert_eq!(vec.len(), FEATURE_COUNT);
        assert!((vec[0] - 55.0).abs() < f64::EPSILON); // age
        assert!((vec[2] - 2.0).abs() < f64::EPSILON); // cp
        assert!((vec[7] - 152.0).abs() < f64::EPSILON); // thalach
        assert!((vec[12] - 2.0).abs() < f64::EPSILON); // thal
    }

    #[test]
    fn test_from_vec_roundtrip() {
        let original = typical_record();
        let record = PatientRecord::from_vec(&original.to_vec()).expect("Should parse");
        assert!((record.age - original.age).abs() < f64::EPSILON);
        assert!((record.oldpeak - original.oldpeak).abs() < f64::EPSILON);

        assert!(PatientRecord::from_vec(&[1.0; 12]).is_err());
    }

    #[test]
    fn test_categorical_codes() {
        assert_eq!(Sex::Female.code(), 0);
        assert_eq!(Sex::Male.code(), 1);
        assert_eq!(ChestPainType::TypicalAngina.code(), 0);
        assert_eq!(ChestPainType::Asymptomatic.code(), 3);
        assert_eq!(RestingEcg::LvHypertrophy.code(), 2);
        assert_eq!(StSlope::Upsloping.code(), 1);
        assert_eq!(StSlope::Downsloping.code(), 3);
        assert_eq!(ThalStatus::Normal.code(), 1);
        assert_eq!(ThalStatus::ReversibleDefect.code(), 3);
    }

    #[test]
    fn test_validation() {
        assert!(typical_record().validate().is_ok());

        let invalid = PatientRecord {
            age: 150.0, // > 120
            slope: 0.0, // widget codes are 1-3
            ..typical_record()
        };
        let errors = invalid.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_boundary_ages_are_valid() {
        let mut record = typical_record();
        record.age = 1.0;
        assert!(record.validate().is_ok());
        record.age = 120.0;
        assert!(record.validate().is_ok());
    }
}
