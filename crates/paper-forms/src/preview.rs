//! Live document preview
//!
//! Pure projection of the values map onto the ordered descriptor list. No
//! side effects and no retained state; the session recomputes it on every
//! value change.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::descriptor::{sort_for_display, FieldDescriptor, FieldType};

/// One visible line of the preview pane.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    pub field_name: String,
    pub label: String,
    pub text: String,
}

/// Rendered preview. The explicit empty state keeps "no fields filled yet"
/// distinguishable from a document that happens to render no entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Preview {
    Empty,
    Document { entries: Vec<PreviewEntry> },
}

impl Preview {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn entries(&self) -> &[PreviewEntry] {
        match self {
            Self::Empty => &[],
            Self::Document { entries } => entries,
        }
    }
}

/// Project the values map in presentation order, skipping fields whose value
/// is absent or blank after trimming.
pub fn render_preview(
    descriptors: &[FieldDescriptor],
    values: &HashMap<String, Value>,
) -> Preview {
    let mut entries = Vec::new();

    for d in sort_for_display(descriptors) {
        let Some(raw) = values.get(&d.field_name).and_then(display_text) else {
            continue;
        };

        let text = match d.field_type {
            FieldType::Date => long_date(&raw),
            FieldType::Text
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Textarea
            | FieldType::Signature
            | FieldType::Select
            | FieldType::Number => raw,
        };

        entries.push(PreviewEntry {
            field_name: d.field_name.clone(),
            label: d.label.clone(),
            text,
        });
    }

    if entries.is_empty() {
        Preview::Empty
    } else {
        Preview::Document { entries }
    }
}

fn display_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// `2024-03-01` renders as `Friday, March 1, 2024`; input that does not
/// parse renders raw.
fn long_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%A, %B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
