//! Form dialog lifecycle shared by every IPD entry form.
//!
//! `Closed → Open → Submitting → Closed (saved) | Open (failed)`.
//!
//! A dialog owns its field values only while open. Submitting is split in
//! two so the host can run the network call outside the dialog borrow:
//! `begin_submit` validates and hands out a ticket, `finish` applies the
//! result. Closing or reopening bumps the generation, so a ticket from an
//! earlier session finishes as `Discarded` with no toast and no callback.
//! The request itself is never cancelled.

pub mod forms;
pub mod notifier;

use std::future::Future;

use thiserror::Error;

use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::models::{AdmissionId, SubmissionStamp};

pub use forms::*;
pub use notifier::{Notifier, Toast, ToastLevel, ToastLog, TracingNotifier};

/// Client-side rejection before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Cannot determine the patient admission from '{0}'")]
    InvalidAdmission(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Dialog is not open")]
    NotOpen,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Where a submission goes: a new record under an admission, or an
/// existing record. Create-only forms use `Infallible` keys, which makes
/// the update branch unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<K> {
    Create(AdmissionId),
    Update(K),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Consultation,
    DoctorNote,
    Recommendation,
    FileUpload,
    Form,
    LabOrder,
    PharmacistNote,
}

impl FormKind {
    pub fn label(&self) -> &'static str {
        match self {
            FormKind::Consultation => "Consultation request",
            FormKind::DoctorNote => "Doctor note",
            FormKind::Recommendation => "Recommendation",
            FormKind::FileUpload => "File",
            FormKind::Form => "Form",
            FormKind::LabOrder => "Lab order",
            FormKind::PharmacistNote => "Pharmacist note",
        }
    }

    pub fn success_message(&self, updating: bool) -> String {
        match (self, updating) {
            (FormKind::FileUpload, _) => "File uploaded successfully".to_string(),
            (kind, true) => format!("{} updated successfully", kind.label()),
            (kind, false) => format!("{} created successfully", kind.label()),
        }
    }

    /// Shown when the backend gives no message of its own.
    pub fn failure_message(&self, updating: bool) -> String {
        let label = self.label().to_lowercase();
        match (self, updating) {
            (FormKind::FileUpload, _) => "Failed to upload file".to_string(),
            (_, true) => format!("Failed to update {label}"),
            (_, false) => format!("Failed to create {label}"),
        }
    }
}

/// One entity type's fields, validation and API mapping.
pub trait DialogForm: Default + Clone + Send + Sync {
    /// Existing record accepted for prefill.
    type Record;
    /// Identifier that routes a submission to the update operation.
    type Key: Clone + std::fmt::Debug + Send + Sync;
    /// Typed request(s) handed to the API.
    type Submission: std::fmt::Debug + Send + Sync;

    const KIND: FormKind;

    fn from_record(record: &Self::Record) -> Self;

    /// `Some` only for records carrying a non-blank identifier.
    fn record_key(record: &Self::Record) -> Option<Self::Key>;

    /// Required-field check. Runs before the admission id is resolved.
    fn validate(&self) -> Result<(), ValidationError>;

    fn build(
        &self,
        target: Target<Self::Key>,
        stamp: SubmissionStamp,
    ) -> Result<Self::Submission, ValidationError>;

    fn send<A: IpdApi>(
        api: &A,
        submission: &Self::Submission,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(SavedRecord),
    /// The API call failed; the dialog is open again with fields intact.
    Failed(String),
    /// Nothing was sent.
    Rejected(SubmitError),
    /// The dialog closed or reopened while the call was in flight.
    Discarded,
}

/// An accepted submission waiting for its API call.
#[derive(Debug)]
pub struct SubmitTicket<F: DialogForm> {
    generation: u64,
    updating: bool,
    submission: F::Submission,
}

impl<F: DialogForm> SubmitTicket<F> {
    /// Perform the single API call for this submission.
    pub async fn dispatch<A: IpdApi>(&self, api: &A) -> Result<SavedRecord, ApiError> {
        F::send(api, &self.submission).await
    }
}

type CompletionCallback = Box<dyn FnMut(&SavedRecord) + Send>;

/// Generic dialog controller, one instance per open-able form.
pub struct FormDialog<F: DialogForm> {
    patient_id: String,
    state: DialogState,
    fields: F,
    editing: Option<F::Key>,
    generation: u64,
    last_error: Option<String>,
    clock: fn() -> SubmissionStamp,
    on_complete: Option<CompletionCallback>,
}

impl<F: DialogForm> FormDialog<F> {
    /// A closed dialog for the patient identified by `patient_id`.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            state: DialogState::Closed,
            fields: F::default(),
            editing: None,
            generation: 0,
            last_error: None,
            clock: SubmissionStamp::now,
            on_complete: None,
        }
    }

    /// Invoked once per successful submission so the caller can refresh.
    pub fn on_complete(mut self, callback: impl FnMut(&SavedRecord) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn with_clock(mut self, clock: fn() -> SubmissionStamp) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == DialogState::Submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Message of the last failed submission in this session.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Open for a new record, or prefilled from `existing`.
    pub fn open(&mut self, existing: Option<&F::Record>) {
        self.generation += 1;
        self.fields = existing.map(F::from_record).unwrap_or_default();
        self.editing = existing.and_then(F::record_key);
        self.last_error = None;
        self.state = DialogState::Open;
        tracing::debug!(
            form = F::KIND.label(),
            editing = self.editing.is_some(),
            "dialog opened"
        );
    }

    /// Cancel or force-close. Field values are discarded.
    pub fn close(&mut self) {
        if self.state == DialogState::Submitting {
            tracing::debug!(form = F::KIND.label(), "dialog closed with submission in flight");
        }
        self.reset_closed();
    }

    /// Apply a field edit. Ignored unless the dialog is open and idle.
    pub fn edit(&mut self, change: impl FnOnce(&mut F)) -> bool {
        if self.state != DialogState::Open {
            return false;
        }
        change(&mut self.fields);
        true
    }

    /// Validate and move to `Submitting`.
    ///
    /// A validation failure emits one error toast and leaves the dialog
    /// open; a dialog that is closed or already submitting refuses
    /// silently.
    pub fn begin_submit(&mut self, notifier: &dyn Notifier) -> Result<SubmitTicket<F>, SubmitError> {
        match self.state {
            DialogState::Closed => return Err(SubmitError::NotOpen),
            DialogState::Submitting => return Err(SubmitError::AlreadySubmitting),
            DialogState::Open => {}
        }

        let submission = self.prepare();
        let submission = match submission {
            Ok(submission) => submission,
            Err(e) => {
                tracing::debug!(form = F::KIND.label(), error = %e, "submission rejected");
                notifier.error(&e.to_string());
                return Err(SubmitError::Invalid(e));
            }
        };

        self.state = DialogState::Submitting;
        self.last_error = None;
        Ok(SubmitTicket {
            generation: self.generation,
            updating: self.editing.is_some(),
            submission,
        })
    }

    fn prepare(&self) -> Result<F::Submission, ValidationError> {
        self.fields.validate()?;
        let target = match &self.editing {
            Some(key) => Target::Update(key.clone()),
            None => Target::Create(
                AdmissionId::parse(&self.patient_id)
                    .ok_or_else(|| ValidationError::InvalidAdmission(self.patient_id.clone()))?,
            ),
        };
        self.fields.build(target, (self.clock)())
    }

    /// Apply the API result of a ticket from `begin_submit`.
    pub fn finish(
        &mut self,
        ticket: SubmitTicket<F>,
        result: Result<SavedRecord, ApiError>,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        if ticket.generation != self.generation || self.state != DialogState::Submitting {
            tracing::debug!(form = F::KIND.label(), "discarding result of a closed dialog");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(saved) => {
                tracing::info!(
                    form = F::KIND.label(),
                    update = ticket.updating,
                    id = ?saved.id,
                    "record saved"
                );
                notifier.success(&F::KIND.success_message(ticket.updating));
                self.reset_closed();
                if let Some(callback) = self.on_complete.as_mut() {
                    callback(&saved);
                }
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::warn!(form = F::KIND.label(), error = %e, "submission failed");
                let message = e
                    .remote_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| F::KIND.failure_message(ticket.updating));
                notifier.error(&message);
                self.state = DialogState::Open;
                self.last_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Full cycle: validate, call the API once, apply the result.
    pub async fn submit<A: IpdApi>(&mut self, api: &A, notifier: &dyn Notifier) -> SubmitOutcome {
        let ticket = match self.begin_submit(notifier) {
            Ok(ticket) => ticket,
            Err(e) => return SubmitOutcome::Rejected(e),
        };
        let result = ticket.dispatch(api).await;
        self.finish(ticket, result, notifier)
    }

    fn reset_closed(&mut self) {
        self.generation += 1;
        self.state = DialogState::Closed;
        self.fields = F::default();
        self.editing = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, NaiveTime};

    use crate::api::RecordingApi;
    use crate::models::*;

    fn fixed_stamp() -> SubmissionStamp {
        SubmissionStamp {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            time: NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
        }
    }

    fn remote_failure(message: Option<&str>) -> Result<SavedRecord, ApiError> {
        Err(ApiError::Remote {
            status: 422,
            message: message.map(str::to_string),
        })
    }

    fn counter() -> (Arc<Mutex<u32>>, impl FnMut(&SavedRecord) + Send + 'static) {
        let count = Arc::new(Mutex::new(0));
        let inner = count.clone();
        (count, move |_: &SavedRecord| *inner.lock().unwrap() += 1)
    }

    fn consultation_dialog() -> FormDialog<ConsultationForm> {
        let mut dialog = FormDialog::<ConsultationForm>::new("1042").with_clock(fixed_stamp);
        dialog.open(None);
        dialog.edit(|f| {
            f.department = "Cardiology".into();
            f.reason = "Evaluate new-onset atrial fibrillation".into();
        });
        dialog
    }

    // ── Lifecycle ────────────────────────────────────────────

    #[test]
    fn new_dialog_is_closed_with_defaults() {
        let dialog = FormDialog::<ConsultationForm>::new("1042");
        assert_eq!(dialog.state(), DialogState::Closed);
        assert!(!dialog.can_submit());
        assert_eq!(dialog.fields().priority, Priority::Routine);
    }

    #[test]
    fn edits_ignored_while_closed() {
        let mut dialog = FormDialog::<ConsultationForm>::new("1042");
        assert!(!dialog.edit(|f| f.reason = "ignored".into()));
        assert_eq!(dialog.fields().reason, "");
    }

    #[test]
    fn cancel_discards_fields() {
        let mut dialog = consultation_dialog();
        dialog.close();
        dialog.open(None);
        assert_eq!(dialog.fields().department, "");
        assert_eq!(dialog.fields().reason, "");
    }

    #[tokio::test]
    async fn success_closes_and_calls_back_once() {
        let api = RecordingApi::new();
        api.push_result(Ok(SavedRecord {
            id: RecordId::new("88"),
        }));
        let toasts = ToastLog::new();
        let (count, callback) = counter();
        let mut dialog = consultation_dialog().on_complete(callback);

        let outcome = dialog.submit(&api, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Saved(SavedRecord {
                id: RecordId::new("88")
            })
        );
        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(*count.lock().unwrap(), 1);
        assert_eq!(api.call_count(), 1);
        assert_eq!(
            toasts.toasts(),
            vec![Toast {
                level: ToastLevel::Success,
                message: "Consultation request created successfully".into(),
            }]
        );

        // A closed dialog cannot be resubmitted, so the callback stays at one.
        assert_eq!(
            dialog.submit(&api, &toasts).await,
            SubmitOutcome::Rejected(SubmitError::NotOpen)
        );
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn failure_keeps_fields_and_reenables_submit() {
        let api = RecordingApi::new();
        api.push_result(remote_failure(Some("Department is not accepting consults")));
        let toasts = ToastLog::new();
        let (count, callback) = counter();
        let mut dialog = consultation_dialog().on_complete(callback);

        let outcome = dialog.submit(&api, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Department is not accepting consults".into())
        );
        assert_eq!(dialog.state(), DialogState::Open);
        assert!(dialog.can_submit());
        assert_eq!(dialog.fields().department, "Cardiology");
        assert_eq!(dialog.fields().reason, "Evaluate new-onset atrial fibrillation");
        assert_eq!(dialog.last_error(), Some("Department is not accepting consults"));
        assert_eq!(*count.lock().unwrap(), 0);
        assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn failure_without_remote_message_uses_fallback() {
        let api = RecordingApi::new();
        api.push_result(Err(ApiError::Timeout(30)));
        let toasts = ToastLog::new();
        let mut dialog = consultation_dialog();

        let outcome = dialog.submit(&api, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed("Failed to create consultation request".into())
        );
    }

    #[tokio::test]
    async fn retry_after_failure_makes_a_second_call() {
        let api = RecordingApi::new();
        api.push_result(remote_failure(None));
        let toasts = ToastLog::new();
        let mut dialog = consultation_dialog();

        dialog.submit(&api, &toasts).await;
        let outcome = dialog.submit(&api, &toasts).await;

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(api.call_count(), 2);
        assert_eq!(toasts.len(), 2);
    }

    #[test]
    fn second_begin_while_submitting_is_refused() {
        let toasts = ToastLog::new();
        let mut dialog = consultation_dialog();

        let _ticket = dialog.begin_submit(&toasts).unwrap();
        assert!(dialog.is_submitting());
        assert!(!dialog.can_submit());
        assert_eq!(
            dialog.begin_submit(&toasts).unwrap_err(),
            SubmitError::AlreadySubmitting
        );
        assert!(!dialog.edit(|f| f.reason = "late edit".into()));
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn result_after_close_is_discarded() {
        let api = RecordingApi::new();
        let toasts = ToastLog::new();
        let (count, callback) = counter();
        let mut dialog = consultation_dialog().on_complete(callback);

        let ticket = dialog.begin_submit(&toasts).unwrap();
        dialog.close();
        let result = ticket.dispatch(&api).await;
        let outcome = dialog.finish(ticket, result, &toasts);

        assert_eq!(outcome, SubmitOutcome::Discarded);
        // The request still went out.
        assert_eq!(api.call_count(), 1);
        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(*count.lock().unwrap(), 0);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn result_after_reopen_is_discarded() {
        let api = RecordingApi::new();
        api.push_result(remote_failure(Some("stale")));
        let toasts = ToastLog::new();
        let mut dialog = consultation_dialog();

        let ticket = dialog.begin_submit(&toasts).unwrap();
        dialog.close();
        dialog.open(None);
        let result = ticket.dispatch(&api).await;

        assert_eq!(dialog.finish(ticket, result, &toasts), SubmitOutcome::Discarded);
        assert_eq!(dialog.state(), DialogState::Open);
        assert_eq!(dialog.last_error(), None);
    }

    #[tokio::test]
    async fn unparseable_patient_id_blocks_create() {
        let api = RecordingApi::new();
        let toasts = ToastLog::new();
        let mut dialog = FormDialog::<PharmacistNoteForm>::new("MRN-unknown");
        dialog.open(None);
        dialog.edit(|f| f.note = "Renal dosing reviewed".into());

        let outcome = dialog.submit(&api, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(SubmitError::Invalid(ValidationError::InvalidAdmission(
                "MRN-unknown".into()
            )))
        );
        assert_eq!(api.call_count(), 0);
        assert_eq!(toasts.len(), 1);
        assert!(dialog.can_submit());
    }

    #[tokio::test]
    async fn update_does_not_need_admission() {
        let api = RecordingApi::new();
        let toasts = ToastLog::new();
        let mut dialog = FormDialog::<PharmacistNoteForm>::new("");
        dialog.open(Some(&PharmacistNote {
            id: Some("31".into()),
            note_type: PharmacistNoteType::DrugInteraction,
            note: "Warfarin + amiodarone".into(),
        }));

        let outcome = dialog.submit(&api, &toasts).await;

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(api.calls()[0].operation, "update_pharmacist_note");
        assert_eq!(
            toasts.last().unwrap().message,
            "Pharmacist note updated successfully"
        );
    }

    // ── Every form: blank required field never reaches the API ──

    async fn assert_rejected<F: DialogForm>(fields: F, missing: &'static str) {
        let api = RecordingApi::new();
        let toasts = ToastLog::new();
        let mut dialog = FormDialog::<F>::new("1042");
        dialog.open(None);
        dialog.edit(|f| *f = fields);

        let outcome = dialog.submit(&api, &toasts).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(SubmitError::Invalid(ValidationError::Required(missing)))
        );
        assert_eq!(dialog.state(), DialogState::Open);
        assert_eq!(api.call_count(), 0);
        assert_eq!(
            toasts.toasts(),
            vec![Toast {
                level: ToastLevel::Error,
                message: format!("{missing} is required"),
            }]
        );
    }

    #[tokio::test]
    async fn every_form_rejects_blank_required_fields() {
        assert_rejected(
            ConsultationForm {
                reason: "Chest pain".into(),
                ..Default::default()
            },
            "Department",
        )
        .await;
        assert_rejected(
            ConsultationForm {
                department: "Neurology".into(),
                reason: "   ".into(),
                ..Default::default()
            },
            "Reason",
        )
        .await;
        assert_rejected(
            DoctorNoteForm {
                note: " \n ".into(),
                plan: "Discharge tomorrow".into(),
                ..Default::default()
            },
            "Note",
        )
        .await;
        assert_rejected(RecommendationForm::default(), "Recommendation").await;
        assert_rejected(FileUploadForm::default(), "File").await;
        assert_rejected(
            GenericForm {
                form_data: r#"{"bp":"120/80"}"#.into(),
                ..Default::default()
            },
            "Form name",
        )
        .await;
        assert_rejected(
            LabOrderForm {
                notes: "Fasting sample".into(),
                ..Default::default()
            },
            "Test name",
        )
        .await;
        assert_rejected(PharmacistNoteForm::default(), "Note").await;
    }
}
