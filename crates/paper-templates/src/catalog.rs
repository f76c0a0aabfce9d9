//! Template catalog
//!
//! Concurrent registry of document templates. Form sessions are only ever
//! started from published templates.

use dashmap::DashMap;
use tracing::info;

use crate::template::DocumentTemplate;
use crate::{Result, TemplateError};

/// Registry of document templates, keyed by template id.
#[derive(Default)]
pub struct TemplateCatalog {
    templates: DashMap<String, DocumentTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Template names are unique within the catalog.
    pub fn register(&self, template: DocumentTemplate) -> Result<()> {
        if self.find_by_name(template.name()).is_some() {
            return Err(TemplateError::DuplicateName(template.name().to_string()));
        }

        info!(
            "Registered template '{}' with {} field(s)",
            template.name(),
            template.field_count()
        );
        self.templates.insert(template.id().to_string(), template);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<DocumentTemplate> {
        self.templates.get(id).map(|t| t.clone())
    }

    pub fn find_by_name(&self, name: &str) -> Option<DocumentTemplate> {
        self.templates
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.clone())
    }

    /// Published templates, name-sorted. Drafts and archived templates are
    /// not served.
    pub fn list_published(&self) -> Vec<DocumentTemplate> {
        let mut published: Vec<DocumentTemplate> = self
            .templates
            .iter()
            .filter(|t| t.is_published())
            .map(|t| t.clone())
            .collect();
        published.sort_by(|a, b| a.name().cmp(b.name()));
        published
    }

    pub fn remove(&self, id: &str) -> Result<DocumentTemplate> {
        self.templates
            .remove(id)
            .map(|(_, t)| t)
            .ok_or(TemplateError::NotFound)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
