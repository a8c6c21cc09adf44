//! Notification store and the handle that feeds it.
//!
//! Data hooks report through a [`Notifier`]; whatever renders feedback reads
//! the [`NotificationStore`] or subscribes to it. Neither side knows about the
//! other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

struct Inner {
    items: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<Notification>,
}

/// Process-wide list of pending notifications. Clones share the list.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                items: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                sender,
            }),
        }
    }

    fn items(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, severity: Severity, message: impl Into<String>) -> u64 {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            severity,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.items().push(notification.clone());
        // No subscribers is fine; the list still holds it.
        let _ = self.inner.sender.send(notification);
        id
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut items = self.items();
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.items().clone()
    }

    pub fn clear(&self) {
        self.items().clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.sender.subscribe()
    }

    pub fn notifier(&self) -> Notifier {
        Notifier { store: self.clone() }
    }
}

/// Write-only handle on a [`NotificationStore`].
#[derive(Clone)]
pub struct Notifier {
    store: NotificationStore,
}

impl Notifier {
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> u64 {
        self.store.push(severity, message)
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(Severity::Error, message)
    }
}
