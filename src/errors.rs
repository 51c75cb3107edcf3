use thiserror::Error;

/// Every failure surfaced by the client.
///
/// The enum is the root of the taxonomy: callers that only care about "the API
/// call failed" can treat any variant uniformly, while the status-derived
/// variants let them react to bad keys or unknown applications.
#[derive(Debug, Error)]
pub enum NewRelicError {
    #[error("missing credentials: both an account id and an api key are required")]
    MissingCredentials,
    #[error("invalid api key: {0}")]
    InvalidApiKey(String),
    #[error("unknown application: {0}")]
    UnknownApplication(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("api unreachable after {attempts} attempts: {message}")]
    Unreachable { attempts: u32, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("{resource} is missing required field `{field}`")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },
}

impl NewRelicError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn missing_field(resource: &'static str, field: &'static str) -> Self {
        Self::MissingField { resource, field }
    }

    /// Maps a non-success HTTP status onto the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            403 => Self::InvalidApiKey(message),
            404 => Self::UnknownApplication(message),
            422 => Self::InvalidParameter(message),
            _ => Self::Api { status, message },
        }
    }

    /// HTTP status the error was derived from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidApiKey(_) => Some(403),
            Self::UnknownApplication(_) => Some(404),
            Self::InvalidParameter(_) => Some(422),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
