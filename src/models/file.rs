use serde::{Deserialize, Serialize};

use super::enums::FileCategory;
use super::identity::AdmissionId;

/// A file picked from the local machine, held in memory until upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// MIME type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Text parts sent alongside the binary part of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub admission_id: AdmissionId,
    pub file_name: String,
    pub file_category: FileCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Multipart upload: one `file` part plus the metadata fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file: SelectedFile,
    pub metadata: FileMetadata,
}

/// A stored file as listed by the IPD service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientFile {
    #[serde(default)]
    pub id: Option<String>,
    pub file_name: String,
    #[serde(default)]
    pub file_category: FileCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
