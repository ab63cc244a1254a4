//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with the `RiskApi` port to implement
//! the client's use cases.

mod assessment;
mod auth;
mod history;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use assessment::AssessmentService;
pub use auth::AuthService;
pub use history::HistoryService;

use crate::adapters::ApiError;
use crate::ports::RiskApi;
use crate::HeartwiseError;

/// Map a port error into the crate error. A 401 means the user must log in.
fn api_error<E: Into<ApiError>>(err: E) -> HeartwiseError {
    match err.into() {
        ApiError::Unauthorized => HeartwiseError::LoginRequired,
        other => {
            tracing::error!("API request failed: {}", other);
            HeartwiseError::Api(other)
        }
    }
}

/// All services sharing one API client (and therefore one session).
pub struct Services<A: RiskApi> {
    pub assessment: AssessmentService<A>,
    pub history: HistoryService<A>,
    pub auth: AuthService<A>,
}

impl<A> Services<A>
where
    A: RiskApi,
    A::Error: Into<ApiError>,
{
    pub fn new(api: Arc<A>) -> Self {
        Self {
            assessment: AssessmentService::new(api.clone()),
            history: HistoryService::new(api.clone()),
            auth: AuthService::new(api),
        }
    }
}
