//! In-memory collaborator implementations for testing
//!
//! The canned generator stands in for a real generation backend; its
//! field-name heuristics are a fixture, not engine behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::descriptor::FieldType;
use crate::ports::{
    DeliveryError, DocumentSink, DraftStore, GenerateError, SessionExit, ValueGenerator,
};
use crate::session::SubmissionPayload;

/// In-memory document sink (for testing)
#[derive(Default)]
pub struct InMemoryDocumentSink {
    created: RwLock<Vec<SubmissionPayload>>,
    reject: bool,
}

impl InMemoryDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that refuses every payload, for delivery-failure paths.
    pub fn rejecting() -> Self {
        Self {
            created: RwLock::new(Vec::new()),
            reject: true,
        }
    }

    pub fn created(&self) -> Vec<SubmissionPayload> {
        self.created.read().clone()
    }
}

#[async_trait]
impl DocumentSink for InMemoryDocumentSink {
    async fn create_document(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError> {
        if self.reject {
            return Err(DeliveryError::Rejected("sink configured to reject".into()));
        }
        self.created.write().push(payload.clone());
        Ok(())
    }
}

/// In-memory draft store (for testing)
#[derive(Default)]
pub struct InMemoryDraftStore {
    saved: RwLock<Vec<SubmissionPayload>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<SubmissionPayload> {
        self.saved.read().clone()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn save_draft(&self, payload: &SubmissionPayload) -> Result<(), DeliveryError> {
        self.saved.write().push(payload.clone());
        Ok(())
    }
}

/// Counts cancel notifications (for testing)
#[derive(Default)]
pub struct RecordingExit {
    cancelled: AtomicUsize,
}

impl RecordingExit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl SessionExit for RecordingExit {
    fn session_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

/// Canned-content generator: fixed strings keyed by field name and type,
/// with an optional artificial delay for exercising timeout and
/// mutual-exclusion behavior.
#[derive(Default)]
pub struct CannedGenerator {
    delay: Option<Duration>,
}

impl CannedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

#[async_trait]
impl ValueGenerator for CannedGenerator {
    async fn generate(
        &self,
        field_name: &str,
        field_type: FieldType,
    ) -> Result<Value, GenerateError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let name = field_name.to_lowercase();
        let text = match field_type {
            FieldType::Email => "jordan.reyes@example.com",
            FieldType::Textarea => {
                "This section sets out the obligations of both parties, including \
                 the handling of confidential information and the term of the agreement."
            }
            _ if name.contains("company") => "Meridian Labs, Inc.",
            _ if name.contains("address") => "410 Terry Ave N, Seattle, WA 98109",
            _ if name.contains("position") => "Senior Software Engineer",
            _ if name.contains("summary") || name.contains("description") => {
                "A concise overview drafted from the surrounding context."
            }
            _ => "Generated text",
        };
        Ok(json!(text))
    }
}

/// Generator that always fails (for testing)
pub struct FailingGenerator;

#[async_trait]
impl ValueGenerator for FailingGenerator {
    async fn generate(&self, _: &str, _: FieldType) -> Result<Value, GenerateError> {
        Err(GenerateError::Failed("backend offline".into()))
    }
}
