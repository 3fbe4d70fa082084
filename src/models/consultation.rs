use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::enums::{Priority, RecordStatus};
use super::identity::{hh_mm, AdmissionId};

/// Body of a new consultation request to another department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateConsultation {
    pub admission_id: AdmissionId,
    pub department: String,
    pub reason: String,
    pub priority: Priority,
    pub status: RecordStatus,
    pub request_date: NaiveDate,
    #[serde(with = "hh_mm")]
    pub request_time: NaiveTime,
}
