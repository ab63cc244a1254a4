//! Assessment input: the 13 clinical fields posted to `/api/predict`.
//!
//! Field names and ordering follow the Cleveland heart disease dataset
//! columns the server model was trained on.

use serde::{Deserialize, Serialize};

/// Number of clinical fields in an assessment.
pub const FIELD_COUNT: usize = 13;

/// Numeric kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
}

/// Static description of one assessment field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON key sent to the server
    pub name: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub min: f64,
    pub max: f64,
}

/// Validation failure for a single field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{0}: This field is required")]
    Missing(&'static str),

    #[error("{0}: Invalid number")]
    NotNumeric(&'static str),

    #[error("{0}: Must be a whole number")]
    NotInteger(&'static str),

    #[error("{label}: Value must be between {min} and {max}")]
    OutOfRange {
        label: &'static str,
        min: String,
        max: String,
    },
}

impl FieldSpec {
    /// Parse and range-check a raw form value.
    ///
    /// # Errors
    /// Returns the first problem found with the value.
    pub fn parse(&self, raw: &str) -> Result<f64, FieldError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FieldError::Missing(self.label));
        }

        let value: f64 = raw.parse().map_err(|_| FieldError::NotNumeric(self.label))?;
        if !value.is_finite() {
            return Err(FieldError::NotNumeric(self.label));
        }
        // Whole-valued decimals such as `58.0` count as integers.
        if self.kind == FieldKind::Integer && value.fract() != 0.0 {
            return Err(FieldError::NotInteger(self.label));
        }

        if value < self.min || value > self.max {
            return Err(FieldError::OutOfRange {
                label: self.label,
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }

        Ok(value)
    }
}

const fn int_field(
    name: &'static str,
    label: &'static str,
    hint: &'static str,
    min: f64,
    max: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        hint,
        kind: FieldKind::Integer,
        min,
        max,
    }
}

/// All assessment fields, in form order.
pub const ASSESSMENT_FIELDS: [FieldSpec; FIELD_COUNT] = [
    int_field("age", "Age", "years (1-120)", 1.0, 120.0),
    int_field("sex", "Sex", "0=female, 1=male", 0.0, 1.0),
    int_field("chest_pain_type", "Chest Pain Type", "0-3 (0=typical angina)", 0.0, 3.0),
    int_field("resting_blood_pressure", "Resting BP", "mmHg (50-250)", 50.0, 250.0),
    int_field("cholesterol", "Cholesterol", "mg/dL (100-600)", 100.0, 600.0),
    int_field("fasting_blood_sugar", "Fasting Blood Sugar", "0=<=120 mg/dL, 1=>120", 0.0, 1.0),
    int_field("resting_ecg", "Resting ECG", "0=normal, 1=ST-T, 2=LVH", 0.0, 2.0),
    int_field("max_heart_rate", "Max Heart Rate", "bpm (50-250)", 50.0, 250.0),
    int_field("exercise_induced_angina", "Exercise Angina", "0=no, 1=yes", 0.0, 1.0),
    FieldSpec {
        name: "st_depression",
        label: "ST Depression",
        hint: "mm (0.0-10.0)",
        kind: FieldKind::Decimal,
        min: 0.0,
        max: 10.0,
    },
    int_field("st_slope", "ST Slope", "0=up, 1=flat, 2=down", 0.0, 2.0),
    int_field("major_vessels", "Major Vessels", "0-4 (fluoroscopy)", 0.0, 4.0),
    int_field("thalassemia", "Thalassemia", "0-3", 0.0, 3.0),
];

/// One complete assessment submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInput {
    pub age: i64,
    pub sex: i64,
    pub chest_pain_type: i64,
    pub resting_blood_pressure: i64,
    pub cholesterol: i64,
    pub fasting_blood_sugar: i64,
    pub resting_ecg: i64,
    pub max_heart_rate: i64,
    pub exercise_induced_angina: i64,
    pub st_depression: f64,
    pub st_slope: i64,
    pub major_vessels: i64,
    pub thalassemia: i64,
}

impl AssessmentInput {
    /// Build an input from raw form values, in [`ASSESSMENT_FIELDS`] order.
    ///
    /// # Errors
    /// Returns every field error found, so the form can report them together.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Result<Self, Vec<FieldError>> {
        if raw.len() != FIELD_COUNT {
            return Err(ASSESSMENT_FIELDS
                .iter()
                .skip(raw.len())
                .map(|spec| FieldError::Missing(spec.label))
                .collect());
        }

        let mut values = [0.0_f64; FIELD_COUNT];
        let mut errors = Vec::new();
        for (i, (spec, value)) in ASSESSMENT_FIELDS.iter().zip(raw).enumerate() {
            match spec.parse(value.as_ref()) {
                Ok(v) => values[i] = v,
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // Integer fields were checked to be whole-valued, so the casts are exact.
        Ok(Self {
            age: values[0] as i64,
            sex: values[1] as i64,
            chest_pain_type: values[2] as i64,
            resting_blood_pressure: values[3] as i64,
            cholesterol: values[4] as i64,
            fasting_blood_sugar: values[5] as i64,
            resting_ecg: values[6] as i64,
            max_heart_rate: values[7] as i64,
            exercise_induced_angina: values[8] as i64,
            st_depression: values[9],
            st_slope: values[10] as i64,
            major_vessels: values[11] as i64,
            thalassemia: values[12] as i64,
        })
    }

    /// Re-check an already built input against the field ranges.
    ///
    /// # Errors
    /// Returns every out-of-range field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = ASSESSMENT_FIELDS
            .iter()
            .zip(self.values())
            .filter_map(|(spec, v)| spec.parse(&v.to_string()).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Field values in [`ASSESSMENT_FIELDS`] order.
    #[must_use]
    pub fn values(&self) -> [f64; FIELD_COUNT] {
        [
            self.age as f64,
            self.sex as f64,
            self.chest_pain_type as f64,
            self.resting_blood_pressure as f64,
            self.cholesterol as f64,
            self.fasting_blood_sugar as f64,
            self.resting_ecg as f64,
            self.max_heart_rate as f64,
            self.exercise_induced_angina as f64,
            self.st_depression,
            self.st_slope as f64,
            self.major_vessels as f64,
            self.thalassemia as f64,
        ]
    }
}

/// Sample values (typical moderate-risk patient), in form order.
pub const SAMPLE_VALUES: [&str; FIELD_COUNT] = [
    "58", "1", "2", "140", "240", "0", "1", "150", "1", "1.4", "1", "1", "2",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_values_parse() {
        let input = AssessmentInput::from_raw(&SAMPLE_VALUES[..]).expect("Sample should parse");
        assert_eq!(input.age, 58);
        assert!((input.st_depression - 1.4).abs() < f64::EPSILON);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_missing_field_blocks_submission() {
        let mut raw: Vec<String> = SAMPLE_VALUES.iter().map(|s| s.to_string()).collect();
        raw[4] = String::new();
        let errors = AssessmentInput::from_raw(&raw).unwrap_err();
        assert_eq!(errors, vec![FieldError::Missing("Cholesterol")]);
    }

    #[test]
    fn test_non_numeric_and_fractional_integer() {
        let mut raw: Vec<String> = SAMPLE_VALUES.iter().map(|s| s.to_string()).collect();
        raw[0] = "abc".to_string();
        raw[1] = "0.5".to_string();
        let errors = AssessmentInput::from_raw(&raw).unwrap_err();
        assert_eq!(
            errors,
            vec![FieldError::NotNumeric("Age"), FieldError::NotInteger("Sex")]
        );
    }

    #[test]
    fn test_whole_valued_decimal_accepted_for_integer_field() {
        let age = &ASSESSMENT_FIELDS[0];
        assert_eq!(age.parse("58.0"), Ok(58.0));

        let mut raw: Vec<String> = SAMPLE_VALUES.iter().map(|s| s.to_string()).collect();
        raw[0] = "58.0".to_string();
        let input = AssessmentInput::from_raw(&raw).expect("Whole decimal should parse");
        assert_eq!(input.age, 58);
    }

    #[test]
    fn test_short_input_reports_missing_tail() {
        let errors = AssessmentInput::from_raw(&SAMPLE_VALUES[..11]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], FieldError::Missing("Major Vessels"));
    }

    #[test]
    fn test_out_of_range() {
        let spec = &ASSESSMENT_FIELDS[3];
        assert!(matches!(spec.parse("300"), Err(FieldError::OutOfRange { .. })));
        assert_eq!(spec.parse(" 120 "), Ok(120.0));
    }

    #[test]
    fn test_serializes_with_wire_names() {
        let input = AssessmentInput::from_raw(&SAMPLE_VALUES[..]).expect("Sample should parse");
        let json = serde_json::to_value(&input).expect("Should serialize");
        let obj = json.as_object().expect("Object");
        assert_eq!(obj.len(), FIELD_COUNT);
        for spec in &ASSESSMENT_FIELDS {
            assert!(obj.contains_key(spec.name), "missing {}", spec.name);
        }
    }
}
