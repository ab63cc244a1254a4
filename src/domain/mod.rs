//! Domain layer: Core types and pure logic.
//!
//! Nothing here performs I/O. All types are serializable and validate
//! their own inputs.

pub mod assessment;
mod auth;
pub mod chat;
mod history;
mod prediction;
mod risk;
mod wizard;

pub use assessment::{AssessmentInput, FieldError, FieldKind, FieldSpec, ASSESSMENT_FIELDS};
pub use auth::{AuthStatus, Credentials};
pub use chat::{respond, ChatAuthor, ChatMessage, ChatReply, ChatTopic, ChatTranscript};
pub use history::{HistoryFilter, HistoryRecord, HistoryResponse};
pub use prediction::{format_timestamp, AdviceContent, DietPlan, Precautions, PredictionResult};
pub use risk::{display_label, RiskLevel};
pub use wizard::WizardStep;
