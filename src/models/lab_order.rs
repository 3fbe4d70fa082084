use serde::{Deserialize, Serialize};

use super::enums::{Priority, RecordStatus};
use super::identity::AdmissionId;

/// A lab order as the IPD service returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabOrder {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLabOrder {
    pub admission_id: AdmissionId,
    pub test_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: RecordStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLabOrder {
    pub test_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
