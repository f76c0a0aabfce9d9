//! OpenPaper Template Catalog (OPTC)
//!
//! Document-type templates for the OpenPaper platform. Each template carries
//! the ordered field descriptors the forms engine turns into a working
//! document form.
//!
//! ## Features
//! - Template aggregate with a draft/published/archived lifecycle
//! - Field-list invariants enforced at the boundary (unique field names)
//! - Concurrent catalog registry serving published templates
//! - Built-in business templates (NDA, offer letter, service agreement)

use thiserror::Error;

mod builtin;
pub mod catalog;
pub mod template;

// Re-exports for convenience
pub use catalog::TemplateCatalog;
pub use template::{DocumentCategory, DocumentTemplate, TemplateStatus};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found")]
    NotFound,

    #[error("Template has no fields")]
    NoFields,

    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    #[error("Duplicate template name: {0}")]
    DuplicateName(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
