use actix_web::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Every way a single relay invocation can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
    #[error("API request failed with status {status}. Body: {body}")]
    RemoteHttp { status: u16, body: String },
    #[error("Could not connect to the LLM API: {0}")]
    Connection(String),
    #[error("LLM API request timed out.")]
    Timeout,
    #[error("{0}")]
    ProtocolViolation(String),
}

impl RelayError {
    pub fn missing_generated_text() -> Self {
        RelayError::ProtocolViolation(
            "No 'generated_text' in the response from the local API".to_string(),
        )
    }

    /// Status returned to the caller for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::RemoteHttp { status, .. } => match *status {
                400..=499 => StatusCode::BAD_REQUEST,
                500..=599 => StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            RelayError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            RelayError::ProtocolViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
