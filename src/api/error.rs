/// Error type for calls against the movie service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The service answered and refused the request (non-2xx status).
    #[error("rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// No definitive answer: connection failure, timeout, broken transport.
    #[error("service unreachable: {0}")]
    Unreachable(String),
    /// The service answered with a body that does not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// The call requires a session and none was supplied.
    #[error("not logged in")]
    Unauthenticated,
}

impl ApiError {
    /// Whether the outcome of the call on the server side is unknown.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Unreachable(_))
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a one-shot user notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Rejected { status, .. } => format!("Request failed ({})", status),
            ApiError::Unreachable(_) => "Could not reach the server".to_string(),
            ApiError::Decode(_) => "Unexpected response from the server".to_string(),
            ApiError::Unauthenticated => "You must be logged in".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return ApiError::Rejected {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        ApiError::Unreachable(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
