//! History service: loads and clears past assessments, fetches advice content.

use std::sync::Arc;

use crate::domain::{AdviceContent, HistoryRecord, RiskLevel};
use crate::ports::RiskApi;
use crate::HeartwiseError;

use super::api_error;

/// Service for the assessment history view.
pub struct HistoryService<A: RiskApi> {
    api: Arc<A>,
}

impl<A> HistoryService<A>
where
    A: RiskApi,
    A::Error: Into<crate::adapters::ApiError>,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Load all history records, in server order.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub fn load(&self) -> Result<Vec<HistoryRecord>, HeartwiseError> {
        let records = self.api.history().map_err(api_error)?;
        tracing::debug!("Loaded {} history records", records.len());
        Ok(records)
    }

    /// Delete all stored assessments on the server.
    ///
    /// # Errors
    /// Returns `HeartwiseError::LoginRequired` if no session is active.
    pub fn clear(&self) -> Result<(), HeartwiseError> {
        tracing::warn!("Clearing assessment history");
        self.api.clear_history().map_err(api_error)?;
        tracing::info!("Assessment history cleared");
        Ok(())
    }

    /// Fetch precautions and diet plan for a risk level.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub fn advice(&self, level: RiskLevel) -> Result<AdviceContent, HeartwiseError> {
        self.api.advice(level).map_err(api_error)
    }
}
