use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{
    optional_text, CreateDoctorNote, DoctorNote, DoctorNoteType, RecordId, SubmissionStamp,
    UpdateDoctorNote,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorNoteForm {
    pub note_type: DoctorNoteType,
    pub note: String,
    pub assessment: String,
    pub plan: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DoctorNoteSubmission {
    Create(CreateDoctorNote),
    Update(RecordId, UpdateDoctorNote),
}

impl DialogForm for DoctorNoteForm {
    type Record = DoctorNote;
    type Key = RecordId;
    type Submission = DoctorNoteSubmission;

    const KIND: FormKind = FormKind::DoctorNote;

    fn from_record(record: &DoctorNote) -> Self {
        Self {
            note_type: record.note_type,
            note: record.note.clone(),
            assessment: record.assessment.clone().unwrap_or_default(),
            plan: record.plan.clone().unwrap_or_default(),
        }
    }

    fn record_key(record: &DoctorNote) -> Option<RecordId> {
        record.id.as_deref().and_then(RecordId::new)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.note, "Note")
    }

    fn build(
        &self,
        target: Target<RecordId>,
        stamp: SubmissionStamp,
    ) -> Result<DoctorNoteSubmission, ValidationError> {
        let note = self.note.trim().to_string();
        let assessment = optional_text(&self.assessment);
        let plan = optional_text(&self.plan);

        Ok(match target {
            Target::Create(admission_id) => DoctorNoteSubmission::Create(CreateDoctorNote {
                admission_id,
                note_type: self.note_type,
                note,
                assessment,
                plan,
                stamp,
            }),
            Target::Update(id) => DoctorNoteSubmission::Update(
                id,
                UpdateDoctorNote {
                    note_type: self.note_type,
                    note,
                    assessment,
                    plan,
                },
            ),
        })
    }

    async fn send<A: IpdApi>(
        api: &A,
        submission: &DoctorNoteSubmission,
    ) -> Result<SavedRecord, ApiError> {
        match submission {
            DoctorNoteSubmission::Create(request) => api.create_doctor_note(request).await,
            DoctorNoteSubmission::Update(id, request) => api.update_doctor_note(id, request).await,
        }
    }
}
