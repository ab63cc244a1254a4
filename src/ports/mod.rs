//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the remote assessment server.

mod risk_api;

pub use risk_api::RiskApi;
