use std::convert::Infallible;

use super::require;
use crate::api::{ApiError, IpdApi, SavedRecord};
use crate::dialog::{DialogForm, FormKind, Target, ValidationError};
use crate::models::{CreateRecommendation, Priority, RecommendationType, RecordStatus, SubmissionStamp};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationForm {
    pub recommendation_type: RecommendationType,
    pub recommendation: String,
    pub priority: Priority,
}

impl DialogForm for RecommendationForm {
    type Record = Infallible;
    type Key = Infallible;
    type Submission = CreateRecommendation;

    const KIND: FormKind = FormKind::Recommendation;

    fn from_record(record: &Infallible) -> Self {
        match *record {}
    }

    fn record_key(record: &Infallible) -> Option<Infallible> {
        match *record {}
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&self.recommendation, "Recommendation")
    }

    fn build(
        &self,
        target: Target<Infallible>,
        _stamp: SubmissionStamp,
    ) -> Result<CreateRecommendation, ValidationError> {
        let admission_id = match target {
            Target::Create(id) => id,
            Target::Update(never) => match never {},
        };
        Ok(CreateRecommendation {
            admission_id,
            recommendation_type: self.recommendation_type,
            recommendation: self.recommendation.trim().to_string(),
            priority: self.priority,
            status: RecordStatus::Pending,
        })
    }

    async fn send<A: IpdApi>(
        api: &A,
        request: &CreateRecommendation,
    ) -> Result<SavedRecord, ApiError> {
        api.create_recommendation(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordingApi;
    use crate::dialog::{FormDialog, SubmitOutcome, ToastLog};
    use serde_json::json;

    #[tokio::test]
    async fn sends_pending_recommendation_without_stamp() {
        let api = RecordingApi::new();
        let toasts = ToastLog::new();
        let mut dialog = FormDialog::<RecommendationForm>::new("5");
        dialog.open(None);
        assert_eq!(dialog.fields().recommendation_type, RecommendationType::Treatment);
        dialog.edit(|f| {
            f.recommendation_type = RecommendationType::Transfer;
            f.recommendation = "Step down to HDU".into();
        });

        let outcome = dialog.submit(&api, &toasts).await;

        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(
            api.calls()[0].body,
            json!({
                "admission_id": 5,
                "recommendation_type": "Transfer",
                "recommendation": "Step down to HDU",
                "priority": "routine",
                "status": "pending",
            })
        );
        assert_eq!(
            toasts.last().unwrap().message,
            "Recommendation created successfully"
        );
    }
}
