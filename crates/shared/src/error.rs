use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes of a call to the generation service.
///
/// Both variants are shown to the user the same way; the split exists for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },
    /// The call never produced a usable response.
    #[error("{message}")]
    TransportFailed { message: String },
}

impl ServiceError {
    pub fn request_failed(status: u16, body: &str) -> Self {
        Self::RequestFailed {
            status,
            message: describe_failure_body(status, body),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportFailed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::RequestFailed { message, .. }
            | ServiceError::TransportFailed { message } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::RequestFailed { status, .. } => Some(*status),
            ServiceError::TransportFailed { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::RequestFailed { .. } => "request_failed",
            ServiceError::TransportFailed { .. } => "transport_failed",
        }
    }
}

/// Error body shape used by the service for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub detail: serde_json::Value,
}

/// Picks the most useful message out of a failed response body: a `detail`
/// field if the body is the service's JSON error, the raw text otherwise, and
/// `HTTP <status>` when the body is empty.
pub fn describe_failure_body(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }

    if let Ok(parsed) = serde_json::from_str::<ServiceErrorBody>(trimmed) {
        match parsed.detail {
            serde_json::Value::String(detail) if !detail.trim().is_empty() => return detail,
            serde_json::Value::Null => {}
            other => return other.to_string(),
        }
    }

    trimmed.to_string()
}
