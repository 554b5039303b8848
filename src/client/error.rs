//! API client errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authentication required (HTTP {0})")]
    AuthRequired(u16),

    #[error("authentication failed for {user}")]
    AuthFailed { user: String },

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("http request failed: {0}")]
    Http(#[from] ureq::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Whether retrying with credentials could succeed. Used by the CLI to
    /// decide when to fall back to the credential prompt.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, ApiError::AuthRequired(_))
    }
}
