//! Per-entity forms plugged into [`FormDialog`](super::FormDialog).

mod consultation;
mod doctor_note;
mod file_upload;
mod generic_form;
mod lab_order;
mod pharmacist_note;
mod recommendation;

pub use consultation::ConsultationForm;
pub use doctor_note::{DoctorNoteForm, DoctorNoteSubmission};
pub use file_upload::FileUploadForm;
pub use generic_form::GenericForm;
pub use lab_order::{LabOrderForm, LabOrderSubmission};
pub use pharmacist_note::{PharmacistNoteForm, PharmacistNoteSubmission};
pub use recommendation::RecommendationForm;

use super::ValidationError;

/// Blank (whitespace-only) text counts as missing.
fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime};

    use crate::models::SubmissionStamp;

    pub fn stamp() -> SubmissionStamp {
        SubmissionStamp {
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            time: NaiveTime::from_hms_opt(7, 5, 0).unwrap(),
        }
    }
}
