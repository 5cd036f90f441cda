use shared::error::ServiceError;
use thiserror::Error;

/// Problems constructing a [`crate::DreamServiceClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid service url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("service url '{0}' cannot carry a path")]
    UnsupportedBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Build(reqwest::Error),
}

pub(crate) fn transport_error(err: reqwest::Error) -> ServiceError {
    let message = if err.is_timeout() {
        "the dream service did not answer in time".to_string()
    } else if err.is_connect() {
        format!("could not reach the dream service: {err}")
    } else {
        format!("request to the dream service failed: {err}")
    };
    ServiceError::transport(message)
}

pub(crate) fn decode_error(err: reqwest::Error) -> ServiceError {
    ServiceError::transport(format!("dream service sent an unreadable response: {err}"))
}
