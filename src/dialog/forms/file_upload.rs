use std::convert::Infallible;

use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{
    optional_text, FileCategory, FileMetadata, SelectedFile, SubmissionStamp, UploadFile,
};

/// Attach a local file to the admission.
///
/// The stored name follows the picked file until the user types their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUploadForm {
    file: Option<SelectedFile>,
    file_name: String,
    name_edited: bool,
    pub file_category: FileCategory,
    pub description: String,
}

impl FileUploadForm {
    pub fn select_file(&mut self, file: SelectedFile) {
        if !self.name_edited {
            self.file_name = file.name.clone();
        }
        self.file = Some(file);
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
        self.name_edited = true;
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }
}

impl DialogForm for FileUploadForm {
    type Record = Infallible;
    type Key = Infallible;
    type Submission = UploadFile;

    const KIND: FormKind = FormKind::FileUpload;

    fn from_record(record: &Infallible) -> Self {
        match *record {}
    }

    fn record_key(record: &Infallible) -> Option<Infallible> {
        match *record {}
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self.file {
            Some(_) => Ok(()),
            None => Err(ValidationError::Required("File")),
        }
    }

    fn build(
        &self,
        target: Target<Infallible>,
        _stamp: SubmissionStamp,
    ) -> Result<UploadFile, ValidationError> {
        let admission_id = match target {
            Target::Create(id) => id,
            Target::Update(never) => match never {},
        };
        let file = self.file.clone().ok_or(ValidationError::Required("File"))?;
        let file_name = optional_text(&self.file_name).unwrap_or_else(|| file.name.clone());

        Ok(UploadFile {
            metadata: FileMetadata {
                admission_id,
                file_name,
                file_category: self.file_category,
                description: optional_text(&self.description),
            },
            file,
        })
    }

    async fn send<A: IpdApi>(api: &A, request: &UploadFile) -> Result<SavedRecord, ApiError> {
        api.upload_file(request).await
    }
}
