//! HTTP adapter: Implementation of `RiskApi` over JSON/HTTP.
//!
//! Uses a blocking `reqwest` client; calls are made from worker threads so the
//! TUI loop never waits on the network.
//!
//! # Session
//!
//! The server's mock login sets a session cookie. The client keeps a cookie
//! store for its whole lifetime, so login, clear-history and logout share the
//! same session just as they would in a browser tab.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{
    AdviceContent, AssessmentInput, AuthStatus, Credentials, HistoryRecord, HistoryResponse,
    PredictionResult, RiskLevel,
};
use crate::ports::RiskApi;

/// Error type for API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not logged in")]
    Unauthorized,

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

/// Error body shapes the server uses (`{"error": ...}` or `{"message": ...}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Longest plain-text error body shown to the user verbatim.
const MAX_PLAIN_ERROR_LEN: usize = 200;

/// Extract a user-facing message from an error response body.
fn error_message(status: StatusCode, body: &str) -> String {
    let reason = || {
        status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string()
    };
    let non_blank = |m: &String| !m.trim().is_empty();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed
            .error
            .filter(non_blank)
            .or_else(|| parsed.message.filter(non_blank))
            .unwrap_or_else(reason);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= MAX_PLAIN_ERROR_LEN && !trimmed.starts_with('<') {
        return trimmed.to_string();
    }

    reason()
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// `reqwest`-backed risk API client.
pub struct HttpRiskApi {
    client: Client,
    base_url: String,
}

impl HttpRiskApi {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into an `ApiError::Status`.
    fn failure(endpoint: &str, response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "API request rejected");
        ApiError::Status {
            status: status.as_u16(),
            message: error_message(status, &body),
        }
    }

    /// Read a successful response body; 401 becomes `Unauthorized`.
    fn read_body(endpoint: &str, response: Response) -> Result<String, ApiError> {
        let status = response.status();
        tracing::debug!(endpoint, status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::failure(endpoint, response));
        }

        Ok(response.text()?)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(endpoint)).send()?;
        let body = Self::read_body(endpoint, response)?;
        decode(endpoint, &body)
    }
}

impl RiskApi for HttpRiskApi {
    type Error = ApiError;

    fn predict(&self, input: &AssessmentInput) -> Result<PredictionResult, ApiError> {
        const ENDPOINT: &str = "/api/predict";
        let response = self.client.post(self.url(ENDPOINT)).json(input).send()?;
        let body = Self::read_body(ENDPOINT, response)?;
        decode(ENDPOINT, &body)
    }

    fn history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let response: HistoryResponse = self.get_json("/api/history")?;
        Ok(response.into_records())
    }

    fn clear_history(&self) -> Result<(), ApiError> {
        const ENDPOINT: &str = "/api/clear-history";
        let response = self.client.post(self.url(ENDPOINT)).send()?;
        Self::read_body(ENDPOINT, response)?;
        Ok(())
    }

    fn advice(&self, level: RiskLevel) -> Result<AdviceContent, ApiError> {
        const ENDPOINT: &str = "/api/get-content";
        let response = self
            .client
            .get(self.url(ENDPOINT))
            .query(&[("risk_level", level.wire_label())])
            .send()?;
        let body = Self::read_body(ENDPOINT, response)?;
        decode(ENDPOINT, &body)
    }

    fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        const ENDPOINT: &str = "/api/login";
        let response = self
            .client
            .post(self.url(ENDPOINT))
            .json(credentials)
            .send()?;

        // A rejected login is a form error, not a missing session.
        if !response.status().is_success() {
            return Err(Self::failure(ENDPOINT, response));
        }
        tracing::debug!(endpoint = ENDPOINT, "Login accepted");
        Ok(())
    }

    fn logout(&self) -> Result<(), ApiError> {
        const ENDPOINT: &str = "/api/logout";
        let response = self.client.post(self.url(ENDPOINT)).send()?;
        Self::read_body(ENDPOINT, response)?;
        Ok(())
    }

    fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.get_json("/api/auth-status")
    }
}
