use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{
    optional_text, CreateLabOrder, LabOrder, Priority, RecordId, RecordStatus, SubmissionStamp,
    UpdateLabOrder,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabOrderForm {
    pub test_name: String,
    pub test_type: String,
    pub priority: Priority,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabOrderSubmission {
    Create(CreateLabOrder),
    Update(RecordId, UpdateLabOrder),
}

impl DialogForm for LabOrderForm {
    type Record = LabOrder;
    type Key = RecordId;
    type Submission = LabOrderSubmission;

    const KIND: FormKind = FormKind::LabOrder;

    fn from_record(record: &LabOrder) -> Self {
        Self {
            test_name: record.test_name.clone(),
            test_type: record.test_type.clone().unwrap_or_default(),
            priority: record.priority,
            notes: record.notes.clone().unwrap_or_default(),
        }
    }

    fn record_key(record: &LabOrder) -> Option<RecordId> {
        record.id.as_deref().and_then(RecordId::new)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.test_name, "Test name")
    }

    fn build(
        &self,
        target: Target<RecordId>,
        _stamp: SubmissionStamp,
    ) -> Result<LabOrderSubmission, ValidationError> {
        let test_name = self.test_name.trim().to_string();
        let test_type = optional_text(&self.test_type);
        let notes = optional_text(&self.notes);

        Ok(match target {
            Target::Create(admission_id) => LabOrderSubmission::Create(CreateLabOrder {
                admission_id,
                test_name,
                test_type,
                priority: self.priority,
                notes,
                status: RecordStatus::Ordered,
            }),
            Target::Update(id) => LabOrderSubmission::Update(
                id,
                UpdateLabOrder {
                    test_name,
                    test_type,
                    priority: self.priority,
                    notes,
                },
            ),
        })
    }

    async fn send<A: IpdApi>(
        api: &A,
        submission: &LabOrderSubmission,
    ) -> Result<SavedRecord, ApiError> {
        match submission {
            LabOrderSubmission::Create(request) => api.create_lab_order(request).await,
            LabOrderSubmission::Update(id, request) => api.update_lab_order(id, request).await,
        }
    }
}
