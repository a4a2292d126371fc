use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("content store connection is not ready")]
    NotReady,

    #[error("write rejected by content store: {0}")]
    WriteRejected(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("content store server error: {0}")]
    ServerError(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response from content store: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl StoreError {
    /// Truncate a response body to avoid carrying excessive data around
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 | 409 | 422 => StoreError::WriteRejected(truncated),
            404 => StoreError::NotFound(truncated),
            500..=599 => StoreError::ServerError(truncated),
            _ => StoreError::InvalidResponse(format!("status {}: {}", status, truncated)),
        }
    }
}
