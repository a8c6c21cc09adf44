//! Domain-typed CRUD over the backend.
//!
//! A repository call is one build, one transport round-trip and one parse.
//! Errors are not caught here; they reach the caller already normalized.

mod attendance;
mod user;

pub use attendance::AttendanceRepository;
pub use user::UserRepository;

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{ApiError, Failure};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

async fn send(transport: &dyn Transport, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    transport
        .execute(request)
        .await
        .map_err(|e| Failure::from(e).into())
}

/// Wrap one repository operation with start/end events.
async fn logged<T, F>(op: &'static str, operation: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let started = Instant::now();
    debug!(op, "repository operation started");
    let result = operation.await;
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => debug!(op, duration_ms, "repository operation finished"),
        Err(err) => warn!(op, duration_ms, status = err.status, message = %err.message, "repository operation failed"),
    }
    result
}
