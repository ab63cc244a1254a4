//! Assessment service: validates form input and requests a prediction.

use std::sync::Arc;

use crate::domain::{AssessmentInput, FieldError, PredictionResult};
use crate::ports::RiskApi;
use crate::HeartwiseError;

use super::api_error;

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Service for submitting assessments.
pub struct AssessmentService<A: RiskApi> {
    api: Arc<A>,
}

impl<A> AssessmentService<A>
where
    A: RiskApi,
    A::Error: Into<crate::adapters::ApiError>,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Turn raw form values into an input. No request is made when any field is bad.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Validation` listing every invalid field.
    pub fn prepare<S: AsRef<str>>(&self, raw: &[S]) -> Result<AssessmentInput, HeartwiseError> {
        AssessmentInput::from_raw(raw).map_err(|errors| HeartwiseError::Validation(join_errors(&errors)))
    }

    /// Send an assessment to the server and return its prediction.
    ///
    /// # Errors
    /// Returns a validation error for out-of-range input, or the API failure.
    pub fn assess(&self, input: &AssessmentInput) -> Result<PredictionResult, HeartwiseError> {
        input
            .validate()
            .map_err(|errors| HeartwiseError::Validation(join_errors(&errors)))?;

        tracing::debug!("Submitting assessment");
        let result = self.api.predict(input).map_err(api_error)?;

        tracing::info!(
            risk = result.risk_level().css_class(),
            percentage = result.risk_percentage,
            "Prediction complete"
        );
        Ok(result)
    }
}
