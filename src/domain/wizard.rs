//! Three-step assessment wizard.
//!
//! Steps are strictly linear. Moving forward requires every field of the
//! current step to parse and be in range; moving back is always allowed.

use std::ops::Range;

use super::assessment::{FieldError, ASSESSMENT_FIELDS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// Age, sex, chest pain, resting BP, cholesterol
    #[default]
    Demographics,
    /// Fasting sugar, resting ECG, max heart rate, exercise angina
    Clinical,
    /// ST depression, ST slope, major vessels, thalassemia
    Exercise,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::Demographics, Self::Clinical, Self::Exercise];

    /// Indices into [`ASSESSMENT_FIELDS`] owned by this step.
    #[must_use]
    pub fn fields(self) -> Range<usize> {
        match self {
            Self::Demographics => 0..5,
            Self::Clinical => 5..9,
            Self::Exercise => 9..13,
        }
    }

    /// 1-based position, for "Step 2 of 3".
    #[must_use]
    pub fn number(self) -> usize {
        match self {
            Self::Demographics => 1,
            Self::Clinical => 2,
            Self::Exercise => 3,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Demographics => "Personal & Vitals",
            Self::Clinical => "Clinical Tests",
            Self::Exercise => "Exercise & Imaging",
        }
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == Self::Exercise
    }

    /// Check the current step's fields.
    ///
    /// # Errors
    /// Returns the first invalid field, with its index.
    pub fn validate<S: AsRef<str>>(self, values: &[S]) -> Result<(), (usize, FieldError)> {
        for idx in self.fields() {
            let spec = &ASSESSMENT_FIELDS[idx];
            let raw = values.get(idx).map_or("", |v| v.as_ref());
            spec.parse(raw).map_err(|e| (idx, e))?;
        }
        Ok(())
    }

    /// Move to the next step if the current one is valid. The last step stays put.
    ///
    /// # Errors
    /// Returns the first invalid field of the current step.
    pub fn advance<S: AsRef<str>>(self, values: &[S]) -> Result<Self, (usize, FieldError)> {
        self.validate(values)?;
        Ok(match self {
            Self::Demographics => Self::Clinical,
            Self::Clinical | Self::Exercise => Self::Exercise,
        })
    }

    #[must_use]
    pub fn back(self) -> Self {
        match self {
            Self::Demographics | Self::Clinical => Self::Demographics,
            Self::Exercise => Self::Clinical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{FIELD_COUNT, SAMPLE_VALUES};

    #[test]
    fn test_steps_cover_all_fields_once() {
        let mut seen = vec![false; FIELD_COUNT];
        for step in WizardStep::ALL {
            for idx in step.fields() {
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_linear_progression() {
        let step = WizardStep::default();
        let step = step.advance(&SAMPLE_VALUES[..]).expect("Step 1 valid");
        assert_eq!(step, WizardStep::Clinical);
        let step = step.advance(&SAMPLE_VALUES[..]).expect("Step 2 valid");
        assert_eq!(step, WizardStep::Exercise);
        let step = step.advance(&SAMPLE_VALUES[..]).expect("Step 3 valid");
        assert_eq!(step, WizardStep::Exercise);
    }

    #[test]
    fn test_invalid_field_blocks_advance() {
        let mut values: Vec<String> = SAMPLE_VALUES.iter().map(|s| s.to_string()).collect();
        values[3] = "999".to_string();
        let err = WizardStep::Demographics.advance(&values).unwrap_err();
        assert_eq!(err.0, 3);

        // Later-step problems do not block an earlier step.
        values[3] = "140".to_string();
        values[12] = String::new();
        assert_eq!(
            WizardStep::Demographics.advance(&values),
            Ok(WizardStep::Clinical)
        );
        assert!(WizardStep::Exercise.validate(&values).is_err());
    }

    #[test]
    fn test_back() {
        assert_eq!(WizardStep::Demographics.back(), WizardStep::Demographics);
        assert_eq!(WizardStep::Exercise.back(), WizardStep::Clinical);
        assert_eq!(WizardStep::Clinical.back(), WizardStep::Demographics);
    }
}
