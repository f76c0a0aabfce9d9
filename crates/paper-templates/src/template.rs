//! Template aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use paper_forms::FieldDescriptor;

use crate::{Result, TemplateError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCategory {
    Legal,
    Hr,
    Sales,
    Finance,
    #[default]
    General,
}

/// One document type: name, lifecycle status, and the ordered field list
/// served to the forms engine.
#[derive(Clone, Debug)]
pub struct DocumentTemplate {
    id: String,
    name: String,
    description: Option<String>,
    category: DocumentCategory,
    status: TemplateStatus,
    fields: Vec<FieldDescriptor>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentTemplate {
    pub fn create(name: impl Into<String>, category: DocumentCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            category,
            status: TemplateStatus::Draft,
            fields: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> DocumentCategory {
        self.category
    }

    pub fn status(&self) -> TemplateStatus {
        self.status
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_published(&self) -> bool {
        self.status == TemplateStatus::Published
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.touch();
    }

    /// Append a field. The `field_name` is the join key into the forms
    /// engine, so duplicates are rejected here at the boundary.
    pub fn add_field(&mut self, field: FieldDescriptor) -> Result<()> {
        if self.fields.iter().any(|f| f.field_name == field.field_name) {
            return Err(TemplateError::DuplicateField(field.field_name));
        }
        self.fields.push(field);
        self.touch();
        Ok(())
    }

    pub fn remove_field(&mut self, field_name: &str) {
        self.fields.retain(|f| f.field_name != field_name);
        self.touch();
    }

    /// Make the template available to form sessions. A template with no
    /// fields cannot be published.
    pub fn publish(&mut self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(TemplateError::NoFields);
        }
        self.status = TemplateStatus::Published;
        self.touch();
        Ok(())
    }

    pub fn archive(&mut self) {
        self.status = TemplateStatus::Archived;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
