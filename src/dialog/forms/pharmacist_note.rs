use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{
    CreatePharmacistNote, PharmacistNote, PharmacistNoteType, RecordId, SubmissionStamp,
    UpdatePharmacistNote,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PharmacistNoteForm {
    pub note_type: PharmacistNoteType,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PharmacistNoteSubmission {
    Create(CreatePharmacistNote),
    Update(RecordId, UpdatePharmacistNote),
}

impl DialogForm for PharmacistNoteForm {
    type Record = PharmacistNote;
    type Key = RecordId;
    type Submission = PharmacistNoteSubmission;

    const KIND: FormKind = FormKind::PharmacistNote;

    fn from_record(record: &PharmacistNote) -> Self {
        Self {
            note_type: record.note_type,
            note: record.note.clone(),
        }
    }

    fn record_key(record: &PharmacistNote) -> Option<RecordId> {
        record.id.as_deref().and_then(RecordId::new)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.note, "Note")
    }

    fn build(
        &self,
        target: Target<RecordId>,
        _stamp: SubmissionStamp,
    ) -> Result<PharmacistNoteSubmission, ValidationError> {
        let note = self.note.trim().to_string();
        Ok(match target {
            Target::Create(admission_id) => {
                PharmacistNoteSubmission::Create(CreatePharmacistNote {
                    admission_id,
                    note_type: self.note_type,
                    note,
                })
            }
            Target::Update(id) => PharmacistNoteSubmission::Update(
                id,
                UpdatePharmacistNote {
                    note_type: self.note_type,
                    note,
                },
            ),
        })
    }

    async fn send<A: IpdApi>(
        api: &A,
        submission: &PharmacistNoteSubmission,
    ) -> Result<SavedRecord, ApiError> {
        match submission {
            PharmacistNoteSubmission::Create(request) => api.create_pharmacist_note(request).await,
            PharmacistNoteSubmission::Update(id, request) => {
                api.update_pharmacist_note(id, request).await
            }
        }
    }
}
