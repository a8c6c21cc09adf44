//! Client-side data layer for the asistencia attendance and user API.
//!
//! # Overview
//! Hook → repository → transport → (network) → repository (envelope
//! unwrapping) → mapper → hook. Request building and response parsing are
//! pure (`client`), the round-trip is behind the [`Transport`] trait, and the
//! hooks add a keyed cache on top.
//!
//! # Design
//! - DTOs (`dto`) and domain records (`model`) are separate types; `mapper`
//!   converts between them.
//! - Every failure reaches callers as an [`ApiError`] produced by
//!   [`create_api_error`].
//! - Shared state lives in an [`AppContext`] created at startup.

pub mod client;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod hooks;
pub mod http;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod notification;
pub mod query;
pub mod repository;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{AttendanceClient, UserClient};
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{create_api_error, ApiError, Failure, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapper::{AttendanceMapper, UserMapper};
pub use model::{Attendance, AttendanceStatus, User};
pub use notification::{Notification, NotificationStore, Notifier, Severity};
pub use query::{MutationState, QueryClient, QueryKey, QueryState, QueryStatus};
pub use repository::{AttendanceRepository, UserRepository};
pub use transport::{ReqwestTransport, Transport};
