//! Validation schema generation
//!
//! Derived, read-only rule set built once per descriptor list. The schema is
//! never mutated after construction; the form session rebuilds it whenever
//! the descriptor list changes.
//!
//! Validation failures are data (a per-field message), never `Err`; only
//! configuration faults use the crate error type.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::descriptor::{FieldDescriptor, FieldType};

/// Permissive patterns: the goal is to catch obvious typos, not to police
/// every RFC corner case.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^\+?[0-9][0-9\s\-().]{5,19}$";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How one field's value is checked.
#[derive(Clone, Debug)]
enum RuleKind {
    Email(Regex),
    Phone(Regex),
    Date,
    /// Numeric coercion with value bounds taken from the descriptor's
    /// `min_length`/`max_length`.
    Number { min: Option<u32>, max: Option<u32> },
    /// Character-count bounds for every other (string-typed) kind.
    Text { min_len: Option<u32>, max_len: Option<u32> },
}

/// Validation rule for a single field.
#[derive(Clone, Debug)]
pub struct FieldRule {
    field_name: String,
    label: String,
    required: bool,
    kind: RuleKind,
}

impl FieldRule {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check a value against this rule. `None` means valid; `Some(message)`
    /// is the inline error to display.
    pub fn check(&self, value: Option<&Value>) -> Option<String> {
        let raw = value.and_then(value_text);

        let text = match raw {
            Some(t) if !t.trim().is_empty() => t,
            // Absent or blank: only required fields object.
            _ => {
                return self
                    .required
                    .then(|| format!("{} is required", self.label));
            }
        };
        let text = text.trim();

        match &self.kind {
            RuleKind::Email(pattern) => (!pattern.is_match(text))
                .then(|| "Enter a valid email address".to_string()),
            RuleKind::Phone(pattern) => (!pattern.is_match(text))
                .then(|| "Enter a valid phone number".to_string()),
            RuleKind::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .is_err()
                .then(|| "Enter a valid date".to_string()),
            RuleKind::Number { min, max } => {
                let n: f64 = match text.parse() {
                    Ok(n) => n,
                    Err(_) => return Some("Enter a valid number".to_string()),
                };
                if let Some(min) = min {
                    if n < f64::from(*min) {
                        return Some(format!("Minimum value is {}", min));
                    }
                }
                if let Some(max) = max {
                    if n > f64::from(*max) {
                        return Some(format!("Maximum value is {}", max));
                    }
                }
                None
            }
            RuleKind::Text { min_len, max_len } => {
                let count = text.chars().count() as u32;
                if let Some(min) = min_len {
                    if count < *min {
                        return Some(format!("Minimum {} characters required", min));
                    }
                }
                if let Some(max) = max_len {
                    if count > *max {
                        return Some(format!("Maximum {} characters allowed", max));
                    }
                }
                None
            }
        }
    }
}

/// Coerce a JSON value to the text the user effectively entered. Numbers are
/// accepted wherever strings are, so numeric inputs can bind either way.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// One rule per `field_name`, in descriptor order.
#[derive(Clone, Debug, Default)]
pub struct ValidationSchema {
    rules: Vec<FieldRule>,
    index: HashMap<String, usize>,
}

impl ValidationSchema {
    /// Build the schema for a descriptor list. Duplicate field names keep
    /// the first descriptor; the session rejects duplicates before this runs.
    pub fn generate(descriptors: &[FieldDescriptor]) -> Self {
        let email = Regex::new(EMAIL_PATTERN).unwrap();
        let phone = Regex::new(PHONE_PATTERN).unwrap();

        let mut schema = Self::default();
        for d in descriptors {
            if schema.index.contains_key(&d.field_name) {
                continue;
            }

            let kind = match d.field_type {
                FieldType::Email => RuleKind::Email(email.clone()),
                FieldType::Phone => RuleKind::Phone(phone.clone()),
                FieldType::Date => RuleKind::Date,
                FieldType::Number => RuleKind::Number {
                    min: d.min_length,
                    max: d.max_length,
                },
                FieldType::Text
                | FieldType::Textarea
                | FieldType::Signature
                | FieldType::Select => RuleKind::Text {
                    min_len: d.min_length,
                    max_len: d.max_length,
                },
            };

            schema.index.insert(d.field_name.clone(), schema.rules.len());
            schema.rules.push(FieldRule {
                field_name: d.field_name.clone(),
                label: d.label.clone(),
                required: d.is_required,
                kind,
            });
        }
        schema
    }

    pub fn rule(&self, field_name: &str) -> Option<&FieldRule> {
        self.index.get(field_name).map(|i| &self.rules[*i])
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check one field against the current values map.
    pub fn check_field(
        &self,
        field_name: &str,
        values: &HashMap<String, Value>,
    ) -> Option<String> {
        self.rule(field_name)
            .and_then(|rule| rule.check(values.get(field_name)))
    }

    /// Check every field; returns the full error set.
    pub fn check_all(&self, values: &HashMap<String, Value>) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        for rule in &self.rules {
            if let Some(message) = rule.check(values.get(&rule.field_name)) {
                errors.insert(rule.field_name.clone(), message);
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor {
            id: name.to_string(),
            field_name: name.to_string(),
            label: name.to_string(),
            field_type,
            is_required: false,
            sort_order: 0,
            placeholder: None,
            help_text: None,
            options: None,
            min_length: None,
            max_length: None,
        }
    }

    fn check(schema: &ValidationSchema, field: &str, value: Value) -> Option<String> {
        let mut values = HashMap::new();
        values.insert(field.to_string(), value);
        schema.check_field(field, &values)
    }

    #[test]
    fn test_one_rule_per_field() {
        let list = vec![
            descriptor("a", FieldType::Text),
            descriptor("b", FieldType::Email),
            descriptor("c", FieldType::Number),
        ];

        let schema = ValidationSchema::generate(&list);
        assert_eq!(schema.len(), 3);
        for d in &list {
            assert!(schema.rule(&d.field_name).is_some());
        }
    }

    #[test]
    fn test_required_rejects_empty_with_label() {
        let mut d = descriptor("email", FieldType::Email);
        d.label = "Work Email".to_string();
        d.is_required = true;
        let schema = ValidationSchema::generate(&[d]);

        let message = check(&schema, "email", json!("")).unwrap();
        assert!(message.contains("Work Email"));

        // Absent entirely is the same failure.
        let errors = schema.check_all(&HashMap::new());
        assert!(errors["email"].contains("Work Email"));
    }

    #[test]
    fn test_optional_accepts_absence() {
        let schema = ValidationSchema::generate(&[descriptor("notes", FieldType::Textarea)]);
        assert_eq!(schema.check_all(&HashMap::new()).len(), 0);
        assert!(check(&schema, "notes", json!("  ")).is_none());
    }

    #[test]
    fn test_email_format() {
        let schema = ValidationSchema::generate(&[descriptor("email", FieldType::Email)]);
        assert!(check(&schema, "email", json!("a@b.com")).is_none());
        assert!(check(&schema, "email", json!("not-an-email")).is_some());
        assert!(check(&schema, "email", json!("a@b")).is_some());
    }

    #[test]
    fn test_phone_format() {
        let schema = ValidationSchema::generate(&[descriptor("phone", FieldType::Phone)]);
        assert!(check(&schema, "phone", json!("+1 (555) 123-4567")).is_none());
        assert!(check(&schema, "phone", json!("555-1234")).is_none());
        assert!(check(&schema, "phone", json!("call me")).is_some());
    }

    #[test]
    fn test_date_must_parse() {
        let schema = ValidationSchema::generate(&[descriptor("startDate", FieldType::Date)]);
        assert!(check(&schema, "startDate", json!("2024-03-01")).is_none());
        assert!(check(&schema, "startDate", json!("2024-02-30")).is_some());
        assert!(check(&schema, "startDate", json!("March 1")).is_some());
    }

    #[test]
    fn test_number_bounds() {
        let mut d = descriptor("seats", FieldType::Number);
        d.min_length = Some(5);
        d.max_length = Some(100);
        let schema = ValidationSchema::generate(&[d]);

        assert_eq!(
            check(&schema, "seats", json!(3)).unwrap(),
            "Minimum value is 5"
        );
        assert!(check(&schema, "seats", json!(5)).is_none());
        assert_eq!(
            check(&schema, "seats", json!(101)).unwrap(),
            "Maximum value is 100"
        );
        // Numeric strings coerce.
        assert!(check(&schema, "seats", json!("42")).is_none());
        assert!(check(&schema, "seats", json!("forty")).is_some());
    }

    #[test]
    fn test_required_number_allows_zero() {
        let mut d = descriptor("discount", FieldType::Number);
        d.is_required = true;
        let schema = ValidationSchema::generate(&[d]);

        assert!(check(&schema, "discount", json!(0)).is_none());
        assert!(check(&schema, "discount", json!("")).is_some());
    }

    #[test]
    fn test_character_bounds() {
        let mut d = descriptor("title", FieldType::Text);
        d.min_length = Some(3);
        d.max_length = Some(5);
        let schema = ValidationSchema::generate(&[d]);

        assert_eq!(
            check(&schema, "title", json!("ab")).unwrap(),
            "Minimum 3 characters required"
        );
        assert!(check(&schema, "title", json!("abc")).is_none());
        assert_eq!(
            check(&schema, "title", json!("abcdef")).unwrap(),
            "Maximum 5 characters allowed"
        );
    }
}
