//! # Heartwise
//!
//! Terminal client for a heart disease risk assessment server.
//!
//! This crate provides:
//! - A three-step assessment form posting 13 clinical values to the server
//! - Color-coded risk results with precaution and diet advice
//! - Assessment history with risk filtering
//! - Mock login/logout and a scripted (keyword-based) health assistant
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (assessment input, risk levels, history, chat, wizard)
//! - `ports`: Trait definition for the remote server
//! - `adapters`: Concrete implementations (reqwest HTTP client, log redaction)
//! - `application`: Use cases orchestrating domain and ports
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{AssessmentInput, PredictionResult, RiskLevel};

/// Result type for Heartwise operations
pub type Result<T> = std::result::Result<T, HeartwiseError>;

/// Main error type for Heartwise
#[derive(Debug, thiserror::Error)]
pub enum HeartwiseError {
    #[error("{0}")]
    Api(#[from] adapters::ApiError),

    #[error("Please fill all fields correctly: {0}")]
    Validation(String),

    #[error("Please log in to continue")]
    LoginRequired,

    #[error("Configuration error: {0}")]
    Config(String),
}
