use std::convert::Infallible;

use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{optional_text, parse_form_data, CreateForm, RecordStatus, SubmissionStamp};

/// Free-form clinical form. `form_data` is typed as text and sent as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericForm {
    pub form_name: String,
    pub form_type: String,
    pub form_data: String,
}

impl DialogForm for GenericForm {
    type Record = Infallible;
    type Key = Infallible;
    type Submission = CreateForm;

    const KIND: FormKind = FormKind::Form;

    fn from_record(record: &Infallible) -> Self {
        match *record {}
    }

    fn record_key(record: &Infallible) -> Option<Infallible> {
        match *record {}
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.form_name, "Form name")
    }

    fn build(
        &self,
        target: Target<Infallible>,
        _stamp: SubmissionStamp,
    ) -> Result<CreateForm, ValidationError> {
        let admission_id = match target {
            Target::Create(id) => id,
            Target::Update(never) => match never {},
        };
        Ok(CreateForm {
            admission_id,
            form_name: self.form_name.trim().to_string(),
            form_type: optional_text(&self.form_type),
            form_data: parse_form_data(&self.form_data),
            status: RecordStatus::Draft,
        })
    }

    async fn send<A: IpdApi>(api: &A, request: &CreateForm) -> Result<SavedRecord, ApiError> {
        api.create_form(request).await
    }
}
