use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::DoctorNoteType;
use super::identity::{AdmissionId, SubmissionStamp};

/// A doctor note as the IPD service returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorNote {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub note_type: DoctorNoteType,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub assessment: Option<String>,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDoctorNote {
    pub admission_id: AdmissionId,
    pub note_type: DoctorNoteType,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(flatten)]
    pub stamp: SubmissionStamp,
}

/// Edits never re-stamp the note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDoctorNote {
    pub note_type: DoctorNoteType,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}
