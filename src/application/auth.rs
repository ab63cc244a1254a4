//! Auth service: mock login/logout against the server session.

use std::sync::Arc;

use crate::domain::{AuthStatus, Credentials};
use crate::ports::RiskApi;
use crate::HeartwiseError;

use super::api_error;

pub struct AuthService<A: RiskApi> {
    api: Arc<A>,
}

impl<A> AuthService<A>
where
    A: RiskApi,
    A::Error: Into<crate::adapters::ApiError>,
{
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Current session state.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub fn status(&self) -> Result<AuthStatus, HeartwiseError> {
        self.api.auth_status().map_err(api_error)
    }

    /// Log in. Blank fields are rejected locally.
    ///
    /// # Errors
    /// Returns `HeartwiseError::Validation` for blank fields, or the server's rejection.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthStatus, HeartwiseError> {
        credentials.validate().map_err(HeartwiseError::Validation)?;

        self.api.login(credentials).map_err(api_error)?;
        tracing::info!("Logged in");
        Ok(AuthStatus::logged_in_as(credentials.username.trim()))
    }

    /// # Errors
    /// Returns error if the request fails.
    pub fn logout(&self) -> Result<AuthStatus, HeartwiseError> {
        self.api.logout().map_err(api_error)?;
        tracing::info!("Logged out");
        Ok(AuthStatus::default())
    }
}
