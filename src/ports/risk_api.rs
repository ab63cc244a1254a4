//! Risk API port: Trait over the assessment server's endpoints.
//!
//! The server owns risk scoring, persistence and advice content; this trait
//! is the only way the rest of the crate reaches it.

use crate::domain::{
    AdviceContent, AssessmentInput, AuthStatus, Credentials, HistoryRecord, PredictionResult,
    RiskLevel,
};

/// Client for the risk assessment server.
pub trait RiskApi: Send + Sync {
    /// Error type for API operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// `POST /api/predict`
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    fn predict(&self, input: &AssessmentInput) -> Result<PredictionResult, Self::Error>;

    /// `GET /api/history`, in server order. A missing list is empty.
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    fn history(&self) -> Result<Vec<HistoryRecord>, Self::Error>;

    /// `POST /api/clear-history`
    ///
    /// # Errors
    /// Returns an unauthorized error when no session is active.
    fn clear_history(&self) -> Result<(), Self::Error>;

    /// `GET /api/get-content?risk_level=<LEVEL>`
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    fn advice(&self, level: RiskLevel) -> Result<AdviceContent, Self::Error>;

    /// `POST /api/login`
    ///
    /// # Errors
    /// Returns the server's error message when the login is rejected.
    fn login(&self, credentials: &Credentials) -> Result<(), Self::Error>;

    /// `POST /api/logout`
    ///
    /// # Errors
    /// Returns error on transport failure.
    fn logout(&self) -> Result<(), Self::Error>;

    /// `GET /api/auth-status`
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status.
    fn auth_status(&self) -> Result<AuthStatus, Self::Error>;
}
