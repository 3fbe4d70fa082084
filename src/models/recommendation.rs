use serde::{Deserialize, Serialize};

use super::enums::{Priority, RecommendationType, RecordStatus};
use super::identity::AdmissionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecommendation {
    pub admission_id: AdmissionId,
    pub recommendation_type: RecommendationType,
    pub recommendation: String,
    pub priority: Priority,
    pub status: RecordStatus,
}
