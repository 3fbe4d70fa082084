use thiserror::Error;

/// Failures talking to the IPD service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("IPD service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("IPD service returned error (status {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Remote { status: u16, message: Option<String> },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

impl ApiError {
    /// Message supplied by the backend, if any. This is what users see;
    /// transport details stay in the logs.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            ApiError::Remote { message, .. } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}
