use serde::{Deserialize, Serialize};

use super::enums::PharmacistNoteType;
use super::identity::AdmissionId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PharmacistNote {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub note_type: PharmacistNoteType,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePharmacistNote {
    pub admission_id: AdmissionId,
    pub note_type: PharmacistNoteType,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePharmacistNote {
    pub note_type: PharmacistNoteType,
    pub note: String,
}
