use reqwest::StatusCode;

/// Failure to reach the task-scoped credential slot.
///
/// This only happens when code touches the slot outside any active unit of
/// work. Callers must treat the unit of work as unauthenticated rather than
/// silently proceeding with someone else's credential.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("credential storage is not available outside an active unit of work")]
    Unavailable,
}

/// Errors surfaced by the typed internal service clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthenticated: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream service error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("service returned error code {code}: {message}")]
    Api { code: i32, message: String },
    #[error("malformed response envelope: {0}")]
    Envelope(String),
    #[error("invalid service base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Map a non-2xx upstream status to a client error, keeping the
    /// receiving service's message where one was provided.
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Upstream {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// System-token issuance failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("system token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("internal token secret is not configured")]
    MissingSecret,
}
