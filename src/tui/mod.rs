//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a tabbed interface for:
//! - The three-step assessment wizard and its results
//! - Assessment history with filtering and advice
//! - The scripted health assistant
//! - Mock login/logout

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Tab};
pub use styles::HeartTheme;
pub use worker::{ApiOutcome, ApiProgress, ApiTask, ApiWorker, ApiWorkerHandle, TaskKind};
