//! Error types for the asistencia API client.
//!
//! # Design
//! Every failure a caller can observe is an [`ApiError`]: a message, an
//! HTTP-like status and the raw payload when one exists. The different ways
//! an operation can go wrong are first captured as a [`Failure`] and then
//! collapsed by [`create_api_error`], so the status defaulting and message
//! selection rules live in one place.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;

/// Status used when the failure did not come with one.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Uniform error shape surfaced by repositories and hooks.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (status {status})")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    /// Raw response payload, when the server sent one.
    pub data: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Network-layer failure.
///
/// `response` is `None` when nothing came back (connection refused, DNS,
/// timeout) and `Some` when the server answered with an error status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub response: Option<HttpResponse>,
}

impl TransportError {
    pub fn no_response(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// Wrap an error-status response with the transport's default message.
    pub fn from_response(response: HttpResponse) -> Self {
        Self {
            message: format!("Request failed with status code {}", response.status),
            response: Some(response),
        }
    }
}

/// Anything that can go wrong while performing an operation, before
/// normalization.
#[derive(Debug)]
pub enum Failure {
    /// Transport failure or HTTP error response.
    Transport(TransportError),
    /// Local failure unrelated to the network (serialization, mapping,
    /// missing envelope payload).
    Local(Box<dyn std::error::Error + Send + Sync>),
    /// Already normalized.
    Api(ApiError),
    /// Any other value, kept as its string form.
    Other(String),
}

impl Failure {
    pub fn local<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Failure::Local(err.into())
    }
}

impl From<TransportError> for Failure {
    fn from(err: TransportError) -> Self {
        Failure::Transport(err)
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        Failure::Api(err)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(err: serde_json::Error) -> Self {
        Failure::Local(Box::new(err))
    }
}

impl From<String> for Failure {
    fn from(value: String) -> Self {
        Failure::Other(value)
    }
}

impl From<&str> for Failure {
    fn from(value: &str) -> Self {
        Failure::Other(value.to_string())
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        create_api_error(failure)
    }
}

/// Normalize a [`Failure`] into an [`ApiError`].
///
/// Transport failures keep the response status (500 without a response) and
/// prefer the server's `message` field over the transport's own message.
/// Everything else becomes status 500, except an `ApiError` which is returned
/// unchanged.
pub fn create_api_error(failure: Failure) -> ApiError {
    match failure {
        Failure::Transport(err) => {
            let Some(response) = err.response else {
                return ApiError::new(err.message, DEFAULT_ERROR_STATUS);
            };
            let data = response_payload(&response.body);
            let message = data
                .as_ref()
                .and_then(|d| d.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(err.message);
            ApiError {
                message,
                status: response.status,
                data,
            }
        }
        Failure::Local(err) => ApiError::new(err.to_string(), DEFAULT_ERROR_STATUS),
        Failure::Api(err) => err,
        Failure::Other(value) => ApiError::new(value, DEFAULT_ERROR_STATUS),
    }
}

/// Body as JSON, falling back to the raw text; `None` for an empty body.
fn response_payload(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}
