use std::convert::Infallible;

use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{CreateConsultation, Priority, RecordStatus, SubmissionStamp};

/// Request for another department to see the patient. Create-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultationForm {
    pub department: String,
    pub reason: String,
    pub priority: Priority,
}

impl DialogForm for ConsultationForm {
    type Record = Infallible;
    type Key = Infallible;
    type Submission = CreateConsultation;

    const KIND: FormKind = FormKind::Consultation;

    fn from_record(record: &Infallible) -> Self {
        match *record {}
    }

    fn record_key(record: &Infallible) -> Option<Infallible> {
        match *record {}
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.department, "Department")?;
        require(&self.reason, "Reason")
    }

    fn build(
        &self,
        target: Target<Infallible>,
        stamp: SubmissionStamp,
    ) -> Result<CreateConsultation, ValidationError> {
        let admission_id = match target {
            Target::Create(id) => id,
            Target::Update(never) => match never {},
        };
        Ok(CreateConsultation {
            admission_id,
            department: self.department.trim().to_string(),
            reason: self.reason.trim().to_string(),
            priority: self.priority,
            status: RecordStatus::Pending,
            request_date: stamp.date,
            request_time: stamp.time,
        })
    }

    async fn send<A: IpdApi>(api: &A, request: &CreateConsultation) -> Result<SavedRecord, ApiError> {
        api.create_consultation(request).await
    }
}
