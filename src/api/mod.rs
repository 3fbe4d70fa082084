//! IPD service boundary.
//!
//! `IpdApi` is the only way dialogs and panels reach the hospital backend.
//! `HttpIpdClient` talks to it over REST; `RecordingApi` stands in for it
//! in tests.

pub mod client;
pub mod error;
pub mod mock;
pub mod types;

use std::future::Future;

pub use client::HttpIpdClient;
pub use error::ApiError;
pub use mock::{ApiCall, RecordingApi};
pub use types::{DashboardStats, SavedRecord};

use crate::models::{
    CreateConsultation, CreateDoctorNote, CreateForm, CreateLabOrder, CreatePharmacistNote,
    CreateRecommendation, RecordId, UpdateDoctorNote, UpdateLabOrder, UpdatePharmacistNote,
    UploadFile,
};

/// Remote operations consumed by the IPD console.
///
/// Creates are keyed by the admission id carried in the request; updates by
/// the record id. Every call is a single attempt: no retry, no dedup key.
pub trait IpdApi: Send + Sync {
    fn create_consultation(
        &self,
        request: &CreateConsultation,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn create_doctor_note(
        &self,
        request: &CreateDoctorNote,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn update_doctor_note(
        &self,
        id: &RecordId,
        request: &UpdateDoctorNote,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn create_recommendation(
        &self,
        request: &CreateRecommendation,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn upload_file(
        &self,
        request: &UploadFile,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn create_form(
        &self,
        request: &CreateForm,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn create_lab_order(
        &self,
        request: &CreateLabOrder,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn update_lab_order(
        &self,
        id: &RecordId,
        request: &UpdateLabOrder,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn create_pharmacist_note(
        &self,
        request: &CreatePharmacistNote,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn update_pharmacist_note(
        &self,
        id: &RecordId,
        request: &UpdatePharmacistNote,
    ) -> impl Future<Output = Result<SavedRecord, ApiError>> + Send;

    fn fetch_dashboard_stats(
        &self,
    ) -> impl Future<Output = Result<DashboardStats, ApiError>> + Send;
}
