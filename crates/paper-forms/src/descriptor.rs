//! Field descriptor model
//!
//! Server-supplied metadata describing one form field. Descriptors arrive as
//! camelCase JSON from the template service and drive schema generation,
//! rendering, and preview.

use serde::{Deserialize, Serialize};

use crate::{FormsError, Result};

/// Closed set of field kinds.
///
/// Every dispatch site matches this enum exhaustively, so adding a variant is
/// a compile-time change across schema generation, rendering, and preview.
/// An unrecognized tag in upstream data fails deserialization before a form
/// session ever starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Date,
    Textarea,
    Signature,
    Select,
    Number,
}

/// One form field as described by the template service.
///
/// `min_length`/`max_length` are dual-purpose by upstream convention:
/// character-count bounds for text-like fields, numeric value bounds for
/// `number` fields. The meaning is keyed strictly off `field_type`; schema
/// producers should read them accordingly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub id: String,
    /// Join key into the values map and validation schema; unique per list.
    pub field_name: String,
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub is_required: bool,
    /// Presentation order, ascending; ties keep list order.
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub help_text: Option<String>,
    /// JSON-encoded list of choice strings; `select` fields only.
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub max_length: Option<u32>,
}

impl FieldDescriptor {
    /// Parse the serialized `options` payload for a `select` field.
    ///
    /// A missing or malformed payload is a configuration fault in upstream
    /// data and is surfaced loudly rather than defaulted away.
    pub fn parse_options(&self) -> Result<Vec<String>> {
        let raw = self
            .options
            .as_deref()
            .ok_or_else(|| FormsError::InvalidOptions {
                field: self.field_name.clone(),
                reason: "no options payload".into(),
            })?;

        serde_json::from_str::<Vec<String>>(raw).map_err(|e| FormsError::InvalidOptions {
            field: self.field_name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Order descriptors for presentation: ascending `sort_order`, ties keeping
/// list order. The field renderer and the preview both use this ordering so
/// the two panes stay visually aligned.
pub fn sort_for_display(descriptors: &[FieldDescriptor]) -> Vec<&FieldDescriptor> {
    let mut ordered: Vec<&FieldDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|d| d.sort_order);
    ordered
}
