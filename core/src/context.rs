//! Application-wide state, created once at startup and handed out by handle.
//!
//! # Design
//! The query cache and the notification store are the only shared mutable
//! state. `AppContext` owns both, wires repositories and hooks to them and
//! tears them down in `shutdown`. Nothing in the crate reaches them through
//! statics.

use std::sync::Arc;

use tracing::info;

use crate::config::ClientConfig;
use crate::hooks::{AttendanceHooks, UserHooks};
use crate::notification::{NotificationStore, Notifier};
use crate::query::{QueryClient, QueryDefaults};
use crate::repository::{AttendanceRepository, UserRepository};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct AppContext {
    config: ClientConfig,
    queries: QueryClient,
    notifications: NotificationStore,
    attendance: AttendanceHooks,
    users: UserHooks,
}

impl AppContext {
    /// Build the context over a reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn init(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let queries = QueryClient::new(QueryDefaults {
            retry: config.query_retry,
            retry_delay: config.query_retry_delay,
            stale_time: config.query_stale_time,
            gc_time: config.query_gc_time,
        });
        let notifications = NotificationStore::new();

        let attendance_repository =
            Arc::new(AttendanceRepository::new(&config.base_url, transport.clone()));
        let user_repository = Arc::new(UserRepository::new(&config.base_url, transport));

        let attendance = AttendanceHooks::new(attendance_repository, queries.clone())
            .with_notifier(notifications.notifier());
        let users = UserHooks::new(user_repository, queries.clone())
            .with_notifier(notifications.notifier());

        info!(base_url = %config.base_url, retry = config.query_retry, "client context initialized");
        Self {
            config,
            queries,
            notifications,
            attendance,
            users,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn notifier(&self) -> Notifier {
        self.notifications.notifier()
    }

    pub fn attendance(&self) -> &AttendanceHooks {
        &self.attendance
    }

    pub fn users(&self) -> &UserHooks {
        &self.users
    }

    /// Drop cached queries and pending notifications.
    pub fn shutdown(self) {
        self.queries.clear();
        self.notifications.clear();
        info!("client context shut down");
    }
}
