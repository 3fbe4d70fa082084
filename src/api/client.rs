use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, DashboardStats, IpdApi, SavedRecord};
use crate::config::ApiConfig;
use crate::models::{
    AdmissionId, CreateConsultation, CreateDoctorNote, CreateForm, CreateLabOrder,
    CreatePharmacistNote, CreateRecommendation, RecordId, UpdateDoctorNote, UpdateLabOrder,
    UpdatePharmacistNote, UploadFile,
};

/// REST client for the hospital IPD service.
pub struct HttpIpdClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpIpdClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Client configured from `IPD_API_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ApiConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admission_url(&self, admission_id: AdmissionId, collection: &str) -> String {
        format!("{}/admissions/{admission_id}/{collection}", self.base_url)
    }

    /// `{base}/{collection}/{id}` with the id percent-encoded as one path
    /// segment, so `/`, `?` and `#` in an id cannot retarget the request.
    fn record_url(&self, collection: &str, id: &RecordId) -> Result<String, ApiError> {
        // `push` silently drops dot segments.
        if matches!(id.as_str(), "." | "..") {
            return Err(ApiError::HttpClient(format!(
                "record id {id:?} is not a valid path segment"
            )));
        }
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ApiError::HttpClient(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::HttpClient(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(collection)
            .push(id.as_str());
        Ok(url.into())
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::HttpClient(e.to_string())
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "IPD service rejected request");
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message: extract_remote_message(&body),
            });
        }
        Ok(response)
    }

    /// Decode a JSON body; an empty body decodes as `T::default()`.
    async fn decode<T: DeserializeOwned + Default>(response: Response) -> Result<T, ApiError> {
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::ResponseParsing(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text).map_err(|e| ApiError::ResponseParsing(e.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: String,
        body: &B,
    ) -> Result<SavedRecord, ApiError> {
        tracing::debug!(%method, %url, "IPD request");
        let response = self.send(self.request(method, &url).json(body)).await?;
        Self::decode(response).await
    }
}

/// Pull a human-readable message out of an error response body.
///
/// Prefers a non-blank string `message`, then `error`. A short body that
/// is neither JSON nor HTML is used as-is.
fn extract_remote_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let parsed: Value = serde_json::from_str(trimmed).ok()?;
        let field = |name: &str| {
            parsed
                .get(name)
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .map(str::to_string)
        };
        return field("message").or_else(|| field("error"));
    }
    if trimmed.starts_with('<') || trimmed.len() > 200 {
        return None;
    }
    Some(trimmed.to_string())
}

fn upload_form(request: &UploadFile) -> Result<Form, ApiError> {
    let part = Part::bytes(request.file.bytes.clone())
        .file_name(request.file.name.clone())
        .mime_str(&request.file.content_type())
        .map_err(|e| ApiError::HttpClient(e.to_string()))?;

    let meta = &request.metadata;
    let mut form = Form::new()
        .part("file", part)
        .text("admission_id", meta.admission_id.to_string())
        .text("file_name", meta.file_name.clone())
        .text("file_category", meta.file_category.as_str());
    if let Some(description) = &meta.description {
        form = form.text("description", description.clone());
    }
    Ok(form)
}

impl IpdApi for HttpIpdClient {
    async fn create_consultation(
        &self,
        request: &CreateConsultation,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "consultations");
        self.send_json(Method::POST, url, request).await
    }

    async fn create_doctor_note(&self, request: &CreateDoctorNote) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "doctor-notes");
        self.send_json(Method::POST, url, request).await
    }

    async fn update_doctor_note(
        &self,
        id: &RecordId,
        request: &UpdateDoctorNote,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.record_url("doctor-notes", id)?;
        self.send_json(Method::PUT, url, request).await
    }

    async fn create_recommendation(
        &self,
        request: &CreateRecommendation,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "recommendations");
        self.send_json(Method::POST, url, request).await
    }

    async fn upload_file(&self, request: &UploadFile) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.metadata.admission_id, "files");
        let form = upload_form(request)?;
        tracing::debug!(
            %url,
            file = %request.file.name,
            bytes = request.file.bytes.len(),
            "IPD upload"
        );
        let response = self
            .send(self.request(Method::POST, &url).multipart(form))
            .await?;
        Self::decode(response).await
    }

    async fn create_form(&self, request: &CreateForm) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "forms");
        self.send_json(Method::POST, url, request).await
    }

    async fn create_lab_order(&self, request: &CreateLabOrder) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "lab-orders");
        self.send_json(Method::POST, url, request).await
    }

    async fn update_lab_order(
        &self,
        id: &RecordId,
        request: &UpdateLabOrder,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.record_url("lab-orders", id)?;
        self.send_json(Method::PUT, url, request).await
    }

    async fn create_pharmacist_note(
        &self,
        request: &CreatePharmacistNote,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.admission_url(request.admission_id, "pharmacist-notes");
        self.send_json(Method::POST, url, request).await
    }

    async fn update_pharmacist_note(
        &self,
        id: &RecordId,
        request: &UpdatePharmacistNote,
    ) -> Result<SavedRecord, ApiError> {
        let url = self.record_url("pharmacist-notes", id)?;
        self.send_json(Method::PUT, url, request).await
    }

    async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let url = format!("{}/dashboard/stats", self.base_url);
        let response = self.send(self.request(Method::GET, &url)).await?;
        Self::decode(response).await
    }
}
