use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body returned by the relay when it refuses or fails a request
/// before any frame has been sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
}

impl RelayError {
    pub fn missing_diff() -> Self {
        RelayError::Validation("Missing diff content".to_string())
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::Validation(message) => ErrorBody {
                error: message.clone(),
                details: None,
            },
            RelayError::Upstream { message, details } => ErrorBody {
                error: message.clone(),
                details: details.clone(),
            },
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(e: UpstreamError) -> Self {
        RelayError::Upstream {
            message: "Failed to generate notes".to_string(),
            details: Some(e.to_string()),
        }
    }
}

#[cfg(feature = "ssr")]
impl axum::response::IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, axum::Json(self.body())).into_response()
    }
}

/// Failure of the generation backend, either while opening the stream or
/// while it is being consumed.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("connection error: {0}")]
    Connection(String),
}

#[cfg(feature = "ssr")]
impl From<async_openai::error::OpenAIError> for UpstreamError {
    fn from(e: async_openai::error::OpenAIError) -> Self {
        use async_openai::error::OpenAIError;

        match e {
            OpenAIError::Reqwest(e) => UpstreamError::Connection(e.to_string()),
            OpenAIError::StreamError(e) => UpstreamError::Connection(e),
            OpenAIError::ApiError(e) => UpstreamError::Backend(e.message),
            other => UpstreamError::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("frame payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("stored notes are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{}", server_message(.error, .details))]
    Server {
        error: String,
        details: Option<String>,
    },
    #[error("Response body is empty")]
    EmptyBody,
}

fn server_message(error: &str, details: &Option<String>) -> String {
    match details {
        Some(details) => format!("{error}: {details}"),
        None => error.to_string(),
    }
}
