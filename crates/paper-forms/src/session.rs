//! Form session controller
//!
//! Owns the values map, the error set, and the auto-fill busy state for one
//! form session. Every mutation funnels through the same single-field update,
//! whether it comes from user input or an auto-fill completion.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::descriptor::{FieldDescriptor, FieldType};
use crate::ports::{DocumentSink, DraftStore, GenerateError, SessionExit, ValueGenerator};
use crate::preview::{render_preview, Preview};
use crate::render::{autofill_eligible, render_form, FieldControl};
use crate::schema::ValidationSchema;
use crate::{FormsError, Result};

const DEFAULT_AUTOFILL_TIMEOUT: Duration = Duration::from_secs(10);

/// Finished payload handed to the document sink or draft store.
///
/// Serializes flat: field values at the top level next to the metadata keys,
/// the plain key/value object collaborators expect.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub values: HashMap<String, Value>,
    pub document_type: String,
    pub created_at: DateTime<Utc>,
    pub is_draft: bool,
}

/// Grants one auto-fill completion. Tickets carry the session generation
/// observed at request time; a completion whose generation no longer matches
/// is ignored, so a torn-down session cannot be resurrected by a late write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutofillTicket {
    field_name: String,
    field_type: FieldType,
    generation: u64,
}

impl AutofillTicket {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Outcome of an auto-fill request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutofillOutcome {
    /// Generated value written into the values map.
    Applied,
    /// Another field is already generating; this request was a no-op.
    Busy,
    /// Generator failed; the prior value is untouched.
    Failed,
    /// Generator exceeded the session timeout; the prior value is untouched.
    TimedOut,
    /// Completion arrived for a reset or torn-down session and was ignored.
    Stale,
}

/// One form session: a document type plus its descriptor list, validation
/// schema, and live state.
pub struct FormSession {
    id: String,
    document_type: String,
    descriptors: Vec<FieldDescriptor>,
    schema: ValidationSchema,
    values: HashMap<String, Value>,
    errors: HashMap<String, String>,
    busy_field: Option<String>,
    generation: u64,
    autofill_timeout: Duration,
}

impl FormSession {
    /// Start a session for a document type. Rejects descriptor lists with a
    /// duplicate `field_name`, since that is the join key into the values
    /// map and schema.
    pub fn new(
        document_type: impl Into<String>,
        descriptors: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        check_unique(&descriptors)?;

        let document_type = document_type.into();
        let schema = ValidationSchema::generate(&descriptors);
        info!(
            "Starting form session for '{}' with {} field(s)",
            document_type,
            descriptors.len()
        );

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            document_type,
            descriptors,
            schema,
            values: HashMap::new(),
            errors: HashMap::new(),
            busy_field: None,
            generation: 0,
            autofill_timeout: DEFAULT_AUTOFILL_TIMEOUT,
        })
    }

    /// Override the auto-fill bound (default 10s).
    pub fn with_autofill_timeout(mut self, timeout: Duration) -> Self {
        self.autofill_timeout = timeout;
        self
    }

    /// Switch to a new document type: rebuild the schema, reset the values
    /// map and error set, and invalidate any in-flight auto-fill.
    pub fn load(
        &mut self,
        document_type: impl Into<String>,
        descriptors: Vec<FieldDescriptor>,
    ) -> Result<()> {
        check_unique(&descriptors)?;

        self.document_type = document_type.into();
        self.schema = ValidationSchema::generate(&descriptors);
        self.descriptors = descriptors;
        self.values.clear();
        self.errors.clear();
        self.busy_field = None;
        self.generation += 1;
        info!(
            "Loaded '{}' with {} field(s)",
            self.document_type,
            self.descriptors.len()
        );
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }

    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field_name: &str) -> Option<&str> {
        self.errors.get(field_name).map(String::as_str)
    }

    /// Field currently auto-filling, if any.
    pub fn busy_field(&self) -> Option<&str> {
        self.busy_field.as_deref()
    }

    /// Record a value change from user input and revalidate that field only.
    pub fn set_value(&mut self, field_name: &str, value: Value) -> Result<()> {
        if self.schema.rule(field_name).is_none() {
            return Err(FormsError::UnknownField(field_name.to_string()));
        }
        self.apply_value(field_name, value);
        Ok(())
    }

    /// Recompute the full error set; true when everything passes.
    pub fn validate_all(&mut self) -> bool {
        self.errors = self.schema.check_all(&self.values);
        self.errors.is_empty()
    }

    /// Bound controls for the whole form, in presentation order.
    pub fn controls(&self) -> Result<Vec<FieldControl>> {
        render_form(
            &self.descriptors,
            &self.values,
            &self.errors,
            self.busy_field(),
        )
    }

    /// Current preview projection, in the same presentation order.
    pub fn preview(&self) -> Preview {
        render_preview(&self.descriptors, &self.values)
    }

    /// Validate everything and hand the finished document to the sink.
    ///
    /// Any failing field aborts the whole submission and surfaces the full
    /// error set; nothing partial is delivered. The values map survives both
    /// validation and delivery failures so the user can retry.
    pub async fn submit(&mut self, sink: &dyn DocumentSink) -> Result<SubmissionPayload> {
        if !self.validate_all() {
            debug!(
                "Submit blocked for '{}': {} field(s) invalid",
                self.document_type,
                self.errors.len()
            );
            return Err(FormsError::ValidationFailed(self.errors.len()));
        }

        let payload = self.package(false);
        sink.create_document(&payload).await?;
        info!(
            "Submitted '{}' document with {} value(s)",
            self.document_type,
            payload.values.len()
        );
        Ok(payload)
    }

    /// Hand the current values to the draft store, valid or not. Partial
    /// documents are expected; drafts bypass validation.
    pub async fn save_draft(&mut self, store: &dyn DraftStore) -> Result<SubmissionPayload> {
        let payload = self.package(true);
        store.save_draft(&payload).await?;
        info!("Saved draft of '{}'", self.document_type);
        Ok(payload)
    }

    /// Discard the session state and notify the exit collaborator. Any
    /// in-flight auto-fill completion becomes stale.
    pub fn cancel(&mut self, exit: &dyn SessionExit) {
        info!("Cancelled form session for '{}'", self.document_type);
        self.values.clear();
        self.errors.clear();
        self.busy_field = None;
        self.generation += 1;
        exit.session_cancelled();
    }

    /// Claim the auto-fill slot for a field. Returns `None` while another
    /// field is generating (the request is a no-op); errors on unknown or
    /// ineligible fields.
    pub fn begin_autofill(&mut self, field_name: &str) -> Result<Option<AutofillTicket>> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| d.field_name == field_name)
            .ok_or_else(|| FormsError::UnknownField(field_name.to_string()))?;

        if !autofill_eligible(descriptor) {
            return Err(FormsError::AutofillUnsupported(field_name.to_string()));
        }
        if self.busy_field.is_some() {
            return Ok(None);
        }

        let ticket = AutofillTicket {
            field_name: descriptor.field_name.clone(),
            field_type: descriptor.field_type,
            generation: self.generation,
        };
        self.busy_field = Some(ticket.field_name.clone());
        debug!("Auto-fill started for '{}'", field_name);
        Ok(Some(ticket))
    }

    /// Resolve an auto-fill. Stale tickets (session reset or cancelled since
    /// the request) are ignored; failures clear the busy flag and leave the
    /// prior value untouched.
    pub fn complete_autofill(
        &mut self,
        ticket: &AutofillTicket,
        result: std::result::Result<Value, GenerateError>,
    ) -> AutofillOutcome {
        if ticket.generation != self.generation {
            warn!(
                "Ignoring stale auto-fill completion for '{}'",
                ticket.field_name
            );
            return AutofillOutcome::Stale;
        }

        if self.busy_field.as_deref() == Some(ticket.field_name.as_str()) {
            self.busy_field = None;
        }

        match result {
            Ok(value) => {
                self.apply_value(&ticket.field_name, value);
                debug!("Auto-fill applied for '{}'", ticket.field_name);
                AutofillOutcome::Applied
            }
            Err(e) => {
                warn!("Auto-fill failed for '{}': {}", ticket.field_name, e);
                AutofillOutcome::Failed
            }
        }
    }

    /// Run one bounded auto-fill end to end against a generator.
    pub async fn autofill(
        &mut self,
        field_name: &str,
        generator: &dyn ValueGenerator,
    ) -> Result<AutofillOutcome> {
        let Some(ticket) = self.begin_autofill(field_name)? else {
            return Ok(AutofillOutcome::Busy);
        };

        let generate = generator.generate(&ticket.field_name, ticket.field_type);
        match tokio::time::timeout(self.autofill_timeout, generate).await {
            Ok(result) => Ok(self.complete_autofill(&ticket, result)),
            Err(_) => {
                warn!(
                    "Auto-fill timed out after {:?} for '{}'",
                    self.autofill_timeout, field_name
                );
                self.complete_autofill(
                    &ticket,
                    Err(GenerateError::Failed("timed out".to_string())),
                );
                Ok(AutofillOutcome::TimedOut)
            }
        }
    }

    fn apply_value(&mut self, field_name: &str, value: Value) {
        self.values.insert(field_name.to_string(), value);
        match self.schema.check_field(field_name, &self.values) {
            Some(message) => {
                debug!("Field '{}' invalid: {}", field_name, message);
                self.errors.insert(field_name.to_string(), message);
            }
            None => {
                self.errors.remove(field_name);
            }
        }
    }

    fn package(&self, is_draft: bool) -> SubmissionPayload {
        SubmissionPayload {
            values: self.values.clone(),
            document_type: self.document_type.clone(),
            created_at: Utc::now(),
            is_draft,
        }
    }
}

fn check_unique(descriptors: &[FieldDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for d in descriptors {
        if !seen.insert(d.field_name.as_str()) {
            return Err(FormsError::DuplicateField(d.field_name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{
        CannedGenerator, FailingGenerator, InMemoryDocumentSink, InMemoryDraftStore, RecordingExit,
    };
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

    fn required(name: &str, field_type: FieldType) -> FieldDescriptor {
        let mut d = descriptor(name, field_type);
        d.is_required = true;
        d
    }

    fn session(fields: Vec<FieldDescriptor>) -> FormSession {
        FormSession::new("NDA", fields).unwrap()
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let result = FormSession::new(
            "NDA",
            vec![
                descriptor("party", FieldType::Text),
                descriptor("party", FieldType::Text),
            ],
        );
        assert!(matches!(result, Err(FormsError::DuplicateField(_))));
    }

    #[test]
    fn test_set_value_unknown_field() {
        let mut s = session(vec![descriptor("party", FieldType::Text)]);
        assert!(matches!(
            s.set_value("ghost", json!("x")),
            Err(FormsError::UnknownField(_))
        ));
    }

    #[test]
    fn test_set_value_revalidates_incrementally() {
        let mut s = session(vec![required("email", FieldType::Email)]);

        s.set_value("email", json!("nope")).unwrap();
        assert!(s.error("email").is_some());

        s.set_value("email", json!("a@b.com")).unwrap();
        assert!(s.error("email").is_none());
    }

    #[tokio::test]
    async fn test_submit_blocked_keeps_sink_untouched() {
        let mut s = session(vec![required("email", FieldType::Email)]);
        let sink = InMemoryDocumentSink::new();

        let result = s.submit(&sink).await;
        assert!(matches!(result, Err(FormsError::ValidationFailed(1))));
        assert!(s.error("email").unwrap().contains("email"));
        assert_eq!(sink.created().len(), 0);
    }

    #[tokio::test]
    async fn test_submit_packages_flat_payload() {
        let mut s = session(vec![
            required("email", FieldType::Email),
            descriptor("notes", FieldType::Textarea),
        ]);
        s.set_value("email", json!("a@b.com")).unwrap();
        let sink = InMemoryDocumentSink::new();

        let payload = s.submit(&sink).await.unwrap();
        assert_eq!(sink.created().len(), 1);
        assert!(!payload.is_draft);
        assert_eq!(payload.document_type, "NDA");

        let wire = serde_json::to_value(&payload).unwrap();
        assert_eq!(wire["email"], json!("a@b.com"));
        assert_eq!(wire["documentType"], json!("NDA"));
        assert_eq!(wire["isDraft"], json!(false));
        assert!(wire.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_submit_delivery_failure_keeps_values() {
        let mut s = session(vec![required("email", FieldType::Email)]);
        s.set_value("email", json!("a@b.com")).unwrap();

        let sink = InMemoryDocumentSink::rejecting();
        let result = s.submit(&sink).await;
        assert!(matches!(result, Err(FormsError::Delivery(_))));
        assert_eq!(s.value("email"), Some(&json!("a@b.com")));
    }

    #[tokio::test]
    async fn test_drafts_bypass_validation_and_repeat() {
        let mut s = session(vec![required("email", FieldType::Email)]);
        s.set_value("email", json!("incomplete")).unwrap();
        let store = InMemoryDraftStore::new();

        let first = s.save_draft(&store).await.unwrap();
        let second = s.save_draft(&store).await.unwrap();
        assert_eq!(store.saved().len(), 2);
        assert!(first.is_draft && second.is_draft);
        // Structurally identical apart from the timestamp.
        assert_eq!(first.values, second.values);
        assert_eq!(first.document_type, second.document_type);
    }

    #[test]
    fn test_cancel_discards_state_and_notifies() {
        let mut s = session(vec![descriptor("notes", FieldType::Textarea)]);
        s.set_value("notes", json!("keep?")).unwrap();
        let exit = RecordingExit::new();

        s.cancel(&exit);
        assert_eq!(exit.cancelled(), 1);
        assert!(s.values().is_empty());
        assert!(s.errors().is_empty());
    }

    #[tokio::test]
    async fn test_autofill_applies_value() {
        let mut s = session(vec![descriptor("summary", FieldType::Textarea)]);
        let generator = CannedGenerator::new();

        let outcome = s.autofill("summary", &generator).await.unwrap();
        assert_eq!(outcome, AutofillOutcome::Applied);
        assert!(s.value("summary").is_some());
        assert!(s.busy_field().is_none());
    }

    #[test]
    fn test_autofill_mutual_exclusion() {
        let mut s = session(vec![
            descriptor("summary", FieldType::Textarea),
            descriptor("details", FieldType::Textarea),
        ]);

        let ticket = s.begin_autofill("summary").unwrap().unwrap();
        assert_eq!(s.busy_field(), Some("summary"));
        // Second request while one is in flight is a no-op.
        assert!(s.begin_autofill("details").unwrap().is_none());

        s.complete_autofill(&ticket, Ok(json!("generated")));
        assert!(s.busy_field().is_none());
        // Slot is free again.
        assert!(s.begin_autofill("details").unwrap().is_some());
    }

    #[test]
    fn test_autofill_ineligible_field() {
        let mut s = session(vec![descriptor("startDate", FieldType::Date)]);
        assert!(matches!(
            s.begin_autofill("startDate"),
            Err(FormsError::AutofillUnsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_autofill_failure_preserves_prior_value() {
        let mut s = session(vec![descriptor("summary", FieldType::Textarea)]);
        s.set_value("summary", json!("typed by hand")).unwrap();

        let outcome = s.autofill("summary", &FailingGenerator).await.unwrap();
        assert_eq!(outcome, AutofillOutcome::Failed);
        assert_eq!(s.value("summary"), Some(&json!("typed by hand")));
        assert!(s.busy_field().is_none());
        assert!(s.error("summary").is_none());
    }

    #[tokio::test]
    async fn test_autofill_timeout_releases_busy_flag() {
        let mut s = session(vec![descriptor("summary", FieldType::Textarea)])
            .with_autofill_timeout(Duration::from_millis(5));
        let slow = CannedGenerator::with_delay(Duration::from_secs(2));

        let outcome = s.autofill("summary", &slow).await.unwrap();
        assert_eq!(outcome, AutofillOutcome::TimedOut);
        assert!(s.busy_field().is_none());
        assert!(s.value("summary").is_none());
    }

    #[test]
    fn test_stale_completion_after_reload_is_ignored() {
        let mut s = session(vec![descriptor("summary", FieldType::Textarea)]);
        let ticket = s.begin_autofill("summary").unwrap().unwrap();

        s.load("Offer Letter", vec![descriptor("summary", FieldType::Textarea)])
            .unwrap();

        let outcome = s.complete_autofill(&ticket, Ok(json!("late")));
        assert_eq!(outcome, AutofillOutcome::Stale);
        assert!(s.value("summary").is_none());
        assert!(s.busy_field().is_none());
    }

    #[test]
    fn test_stale_completion_after_cancel_is_ignored() {
        let mut s = session(vec![descriptor("summary", FieldType::Textarea)]);
        let ticket = s.begin_autofill("summary").unwrap().unwrap();
        let exit = RecordingExit::new();

        s.cancel(&exit);
        let outcome = s.complete_autofill(&ticket, Ok(json!("late")));
        assert_eq!(outcome, AutofillOutcome::Stale);
        assert!(s.values().is_empty());
    }

    #[test]
    fn test_load_resets_state() {
        let mut s = session(vec![required("email", FieldType::Email)]);
        s.set_value("email", json!("bad")).unwrap();
        assert!(!s.errors().is_empty());

        s.load("Offer Letter", vec![descriptor("position", FieldType::Text)])
            .unwrap();
        assert_eq!(s.document_type(), "Offer Letter");
        assert!(s.values().is_empty());
        assert!(s.errors().is_empty());
        assert!(s.schema().rule("position").is_some());
        assert!(s.schema().rule("email").is_none());
    }

    #[test]
    fn test_controls_and_preview_share_order() {
        let mut a = descriptor("second", FieldType::Text);
        a.sort_order = 2;
        let mut b = descriptor("first", FieldType::Text);
        b.sort_order = 1;

        let mut s = session(vec![a, b]);
        s.set_value("first", json!("1")).unwrap();
        s.set_value("second", json!("2")).unwrap();

        let control_order: Vec<String> = s
            .controls()
            .unwrap()
            .into_iter()
            .map(|c| c.field_name)
            .collect();
        let preview_order: Vec<String> = s
            .preview()
            .entries()
            .iter()
            .map(|e| e.field_name.clone())
            .collect();
        assert_eq!(control_order, preview_order);
    }
}
