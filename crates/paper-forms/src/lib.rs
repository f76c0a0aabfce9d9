//! OpenPaper Forms Engine (OPFE)
//!
//! Schema-driven form core for the OpenPaper document automation platform.
//! A template's field descriptors are turned into a validation schema, a set
//! of bound input controls, and a live document preview that stays in sync
//! with the values map.
//!
//! ## Features
//! - Field descriptor model with a closed, exhaustively-matched type set
//! - Per-field validation rules (format, length, and range checks)
//! - Headless field rendering with input modes and advisory constraints
//! - Form session controller: values map, error set, submit/draft/cancel
//! - Live preview projection with long-form date rendering
//! - Bounded, mutually-exclusive auto-fill via a pluggable generator port

use thiserror::Error;

pub mod descriptor;
pub mod memory;
pub mod ports;
pub mod preview;
pub mod render;
pub mod schema;
pub mod session;

// Re-exports for convenience
pub use descriptor::{sort_for_display, FieldDescriptor, FieldType};
pub use memory::{CannedGenerator, FailingGenerator, InMemoryDocumentSink, InMemoryDraftStore, RecordingExit};
pub use ports::{DeliveryError, DocumentSink, DraftStore, GenerateError, SessionExit, ValueGenerator};
pub use preview::{render_preview, Preview, PreviewEntry};
pub use render::{autofill_eligible, render_field, render_form, ControlKind, FieldControl, InputMode};
pub use schema::{FieldRule, ValidationSchema};
pub use session::{AutofillOutcome, AutofillTicket, FormSession, SubmissionPayload};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Invalid options for field '{field}': {reason}")]
    InvalidOptions { field: String, reason: String },

    #[error("Field '{0}' does not support auto-fill")]
    AutofillUnsupported(String),

    #[error("Validation failed for {0} field(s)")]
    ValidationFailed(usize),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

pub type Result<T> = std::result::Result<T, FormsError>;
