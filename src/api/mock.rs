use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use super::{ApiError, DashboardStats, IpdApi, SavedRecord};
use crate::models::{
    CreateConsultation, CreateDoctorNote, CreateForm, CreateLabOrder, CreatePharmacistNote,
    CreateRecommendation, RecordId, UpdateDoctorNote, UpdateLabOrder, UpdatePharmacistNote,
    UploadFile,
};

/// One call observed by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub operation: &'static str,
    /// Admission id for creates, record id for updates, empty for reads.
    pub key: String,
    pub body: Value,
}

/// In-memory `IpdApi` that records every call and replays queued results.
///
/// With nothing queued, writes succeed with an empty acknowledgement and
/// stats come back as the configured counters.
#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<ApiCall>>,
    results: Mutex<VecDeque<Result<SavedRecord, ApiError>>>,
    stats: Mutex<Option<Result<DashboardStats, ApiError>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next write call.
    pub fn push_result(&self, result: Result<SavedRecord, ApiError>) {
        if let Ok(mut results) = self.results.lock() {
            results.push_back(result);
        }
    }

    pub fn with_stats(self, stats: Result<DashboardStats, ApiError>) -> Self {
        if let Ok(mut slot) = self.stats.lock() {
            *slot = Some(stats);
        }
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn record<B: Serialize>(&self, operation: &'static str, key: String, body: &B) {
        let body = serde_json::to_value(body).unwrap_or(Value::Null);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ApiCall {
                operation,
                key,
                body,
            });
        }
    }

    fn next_result(&self) -> Result<SavedRecord, ApiError> {
        self.results
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Ok(SavedRecord::default()))
    }
}

impl IpdApi for RecordingApi {
    async fn create_consultation(
        &self,
        request: &CreateConsultation,
    ) -> Result<SavedRecord, ApiError> {
        self.record("create_consultation", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn create_doctor_note(&self, request: &CreateDoctorNote) -> Result<SavedRecord, ApiError> {
        self.record("create_doctor_note", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn update_doctor_note(
        &self,
        id: &RecordId,
        request: &UpdateDoctorNote,
    ) -> Result<SavedRecord, ApiError> {
        self.record("update_doctor_note", id.to_string(), request);
        self.next_result()
    }

    async fn create_recommendation(
        &self,
        request: &CreateRecommendation,
    ) -> Result<SavedRecord, ApiError> {
        self.record("create_recommendation", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn upload_file(&self, request: &UploadFile) -> Result<SavedRecord, ApiError> {
        let mut body = serde_json::to_value(&request.metadata).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut body {
            map.insert("source_name".into(), Value::String(request.file.name.clone()));
            map.insert("size".into(), Value::from(request.file.bytes.len()));
        }
        self.record(
            "upload_file",
            request.metadata.admission_id.to_string(),
            &body,
        );
        self.next_result()
    }

    async fn create_form(&self, request: &CreateForm) -> Result<SavedRecord, ApiError> {
        self.record("create_form", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn create_lab_order(&self, request: &CreateLabOrder) -> Result<SavedRecord, ApiError> {
        self.record("create_lab_order", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn update_lab_order(
        &self,
        id: &RecordId,
        request: &UpdateLabOrder,
    ) -> Result<SavedRecord, ApiError> {
        self.record("update_lab_order", id.to_string(), request);
        self.next_result()
    }

    async fn create_pharmacist_note(
        &self,
        request: &CreatePharmacistNote,
    ) -> Result<SavedRecord, ApiError> {
        self.record("create_pharmacist_note", request.admission_id.to_string(), request);
        self.next_result()
    }

    async fn update_pharmacist_note(
        &self,
        id: &RecordId,
        request: &UpdatePharmacistNote,
    ) -> Result<SavedRecord, ApiError> {
        self.record("update_pharmacist_note", id.to_string(), request);
        self.next_result()
    }

    async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.record("fetch_dashboard_stats", String::new(), &Value::Null);
        self.stats
            .lock()
            .ok()
            .and_then(|s| s.clone())
            .unwrap_or_else(|| Ok(DashboardStats::default()))
    }
}
