//! Field rendering
//!
//! Maps a descriptor plus the current values map and error set into a
//! headless control description a view layer can bind directly. Rendering is
//! the point where malformed upstream configuration (bad `select` options)
//! surfaces as a loud error instead of a silent default.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::descriptor::{sort_for_display, FieldDescriptor, FieldType};
use crate::Result;

/// Keyboard/input mode hint for single-line controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    Text,
    Email,
    Tel,
}

/// Concrete control produced for a field.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "lowercase")]
pub enum ControlKind {
    /// Single-line input (`text`, `email`, `phone`, `signature`).
    Line { mode: InputMode },
    /// Fixed-height multi-line input.
    Multiline { rows: u32 },
    /// Calendar date input.
    Date,
    /// Numeric input. The bounds are advisory UI attributes; the validation
    /// schema stays authoritative.
    Number { min: Option<u32>, max: Option<u32> },
    /// Choice list parsed from the descriptor's options payload.
    Select { options: Vec<String> },
}

/// A bound control: everything a view needs to draw one field.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldControl {
    pub field_name: String,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub value: Option<Value>,
    pub error: Option<String>,
    /// Field offers the generate-a-value affordance.
    pub can_autofill: bool,
    /// An auto-fill for this field is currently in flight.
    pub autofilling: bool,
    #[serde(flatten)]
    pub kind: ControlKind,
}

const TEXTAREA_ROWS: u32 = 4;

/// Field names that suggest free-text content worth generating.
const AUTOFILL_HINTS: [&str; 7] = [
    "description",
    "summary",
    "content",
    "details",
    "address",
    "company",
    "position",
];

/// Whether a field gets the auto-fill affordance. Only free-text-leaning
/// kinds qualify, and outside of `textarea` the field name itself has to
/// suggest generatable content.
pub fn autofill_eligible(descriptor: &FieldDescriptor) -> bool {
    let kind_ok = matches!(
        descriptor.field_type,
        FieldType::Textarea | FieldType::Text | FieldType::Email | FieldType::Select
    );
    if !kind_ok {
        return false;
    }
    if descriptor.field_type == FieldType::Textarea {
        return true;
    }

    let name = descriptor.field_name.to_lowercase();
    AUTOFILL_HINTS.iter().any(|hint| name.contains(hint))
}

/// Build the bound control for one field.
pub fn render_field(
    descriptor: &FieldDescriptor,
    values: &HashMap<String, Value>,
    errors: &HashMap<String, String>,
    busy_field: Option<&str>,
) -> Result<FieldControl> {
    let kind = match descriptor.field_type {
        FieldType::Textarea => ControlKind::Multiline {
            rows: TEXTAREA_ROWS,
        },
        FieldType::Select => ControlKind::Select {
            options: descriptor.parse_options()?,
        },
        FieldType::Date => ControlKind::Date,
        FieldType::Number => ControlKind::Number {
            min: descriptor.min_length,
            max: descriptor.max_length,
        },
        FieldType::Email => ControlKind::Line {
            mode: InputMode::Email,
        },
        FieldType::Phone => ControlKind::Line {
            mode: InputMode::Tel,
        },
        FieldType::Text | FieldType::Signature => ControlKind::Line {
            mode: InputMode::Text,
        },
    };

    Ok(FieldControl {
        field_name: descriptor.field_name.clone(),
        label: descriptor.label.clone(),
        required: descriptor.is_required,
        placeholder: descriptor.placeholder.clone(),
        help_text: descriptor.help_text.clone(),
        value: values.get(&descriptor.field_name).cloned(),
        error: errors.get(&descriptor.field_name).cloned(),
        can_autofill: autofill_eligible(descriptor),
        autofilling: busy_field == Some(descriptor.field_name.as_str()),
        kind,
    })
}

/// Render the whole descriptor list in presentation order.
pub fn render_form(
    descriptors: &[FieldDescriptor],
    values: &HashMap<String, Value>,
    errors: &HashMap<String, String>,
    busy_field: Option<&str>,
) -> Result<Vec<FieldControl>> {
    sort_for_display(descriptors)
        .into_iter()
        .map(|d| render_field(d, values, errors, busy_field))
        .collect()
}
