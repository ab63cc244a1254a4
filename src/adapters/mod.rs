//! Adapters layer: Concrete implementations of ports.
//!
//! - `http`: reqwest client for the assessment server
//! - `redact`: credential filtering for logs

pub mod http;
pub mod redact;

pub use http::{ApiError, HttpRiskApi};
