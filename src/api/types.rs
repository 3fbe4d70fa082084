use serde::{Deserialize, Serialize};

use crate::models::RecordId;

/// Acknowledgement of a create, update or upload.
///
/// `id` is whatever identifier the backend echoes back; some endpoints
/// answer with an empty body, which leaves it `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<RecordId>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(crate::models::record_id_from_value(&raw))
}

/// Aggregate ward counters from the IPD dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_patients: u32,
    #[serde(default)]
    pub available_beds: u32,
    #[serde(default)]
    pub critical_patients: u32,
    #[serde(default)]
    pub pending_discharges: u32,
}
