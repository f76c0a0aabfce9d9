//! Collaborator ports
//!
//! Hexagonal boundary: the engine owns form state and hands finished
//! payloads to whatever persistence and navigation the caller wires in.
//! Network, routing, and auth live behind these traits.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::FieldType;
use crate::session::SubmissionPayload;

/// Receives validated submissions ("create document").
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn create_document(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError>;
}

/// Receives unvalidated drafts. Partial documents are expected here.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save_draft(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError>;
}

/// Notified when the user abandons the session ("return to selection").
pub trait SessionExit: Send + Sync {
    fn session_cancelled(&self);
}

/// Best-effort value generation backing the auto-fill affordance.
///
/// Implementations propose a type-appropriate value for one field. The
/// session bounds each call with its auto-fill timeout.
#[async_trait]
pub trait ValueGenerator: Send + Sync {
    async fn generate(&self, field_name: &str, field_type: FieldType)
        -> Result<Value, GenerateError>;
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Collaborator rejected the payload: {0}")]
    Rejected(String),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("Generation failed: {0}")]
    Failed(String),
}
