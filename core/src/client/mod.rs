//! Stateless request builders and response parsers for the backend.
//!
//! # Design
//! Each client holds only a `base_url`. Every operation is split into a
//! `build_*` method that produces an [`HttpRequest`] and a `parse_*` method
//! that consumes an [`HttpResponse`]; the round-trip in between belongs to a
//! [`Transport`](crate::transport::Transport). Parsers own the per-endpoint
//! envelope unwrapping and the DTO to domain mapping.

mod attendance;
mod user;

pub use attendance::AttendanceClient;
pub use user::UserClient;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Failure, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

fn normalize_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn json_request<T: Serialize>(method: HttpMethod, path: String, payload: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(Failure::from)?;
    Ok(HttpRequest::with_json_body(method, path, body))
}

/// Any non-2xx status becomes an error carrying the response.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(Failure::from(TransportError::from_response(response)).into())
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| Failure::from(e).into())
}

fn missing_payload(key: &str) -> ApiError {
    Failure::local(format!("response envelope has no `{key}` payload")).into()
}
