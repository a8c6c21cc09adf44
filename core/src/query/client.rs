use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::key::QueryKey;
use super::state::{MutationState, QueryState};
use crate::error::ApiError;

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, ApiError>>>;

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cache-wide settings.
#[derive(Debug, Clone, Copy)]
pub struct QueryDefaults {
    /// Extra attempts after a failed query fetch.
    pub retry: u32,
    /// Wait before the first retry; doubles on each further attempt, up to
    /// 30 seconds.
    pub retry_delay: Duration,
    /// How long fetched data is served without refetching. Zero means every
    /// read that is not joining an in-flight fetch goes to the network.
    pub stale_time: Duration,
    /// Entries nobody read or wrote for this long are dropped.
    pub gc_time: Duration,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            retry: 1,
            retry_delay: Duration::from_secs(1),
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
        }
    }
}

struct Entry {
    data: Option<CachedValue>,
    error: Option<ApiError>,
    stale: bool,
    updated_at: Option<Instant>,
    last_used: Instant,
    in_flight: Option<(u64, SharedFetch)>,
}

impl Entry {
    fn new() -> Self {
        Self {
            data: None,
            error: None,
            stale: false,
            updated_at: None,
            last_used: Instant::now(),
            in_flight: None,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.stale && self.updated_at.is_some_and(|at| at.elapsed() < stale_time)
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    defaults: QueryDefaults,
    next_fetch_id: AtomicU64,
}

/// Handle to the shared query cache. Clones share the same store.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryDefaults::default())
    }
}

impl QueryClient {
    pub fn new(defaults: QueryDefaults) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                defaults,
                next_fetch_id: AtomicU64::new(1),
            }),
        }
    }

    pub fn defaults(&self) -> QueryDefaults {
        self.inner.defaults
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        // A poisoned lock only means a panic elsewhere; the map stays usable.
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a keyed query.
    ///
    /// When `enabled` is false nothing is fetched and the state is `Idle`,
    /// carrying whatever is already cached under `key`.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, enabled: bool, fetcher: F) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        if !enabled {
            return QueryState::idle(self.get_query_data(&key));
        }
        match self.fetch_query(key.clone(), fetcher).await {
            Ok(data) => QueryState::success(data),
            Err(err) => QueryState::error(err, self.get_query_data(&key)),
        }
    }

    /// Fresh cached data, or the result of a fetch shared with every
    /// concurrent caller of the same key.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (fetch_id, fetch) = {
            let mut entries = self.entries();
            collect_garbage(&mut entries, self.inner.defaults.gc_time);
            let entry = entries.entry(key.clone()).or_insert_with(Entry::new);
            entry.last_used = Instant::now();
            if let (Some(data), true) = (&entry.data, entry.is_fresh(self.inner.defaults.stale_time)) {
                debug!(key = %key, "query cache hit");
                return downcast(data);
            }
            let joined = entry
                .in_flight
                .as_ref()
                .map(|(id, fetch)| (*id, fetch.clone()));
            match joined {
                Some(joined) => {
                    debug!(key = %key, "joining in-flight query");
                    joined
                }
                None => {
                    let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let fetch = with_retry(key.clone(), self.inner.defaults, fetcher)
                        .boxed()
                        .shared();
                    entry.in_flight = Some((id, fetch.clone()));
                    (id, fetch)
                }
            }
        };

        let result = fetch.await;

        {
            let mut entries = self.entries();
            if let Some(entry) = entries.get_mut(&key) {
                let current = matches!(&entry.in_flight, Some((id, _)) if *id == fetch_id);
                if current {
                    entry.in_flight = None;
                    match &result {
                        Ok(value) => {
                            entry.data = Some(value.clone());
                            entry.error = None;
                            entry.stale = false;
                            entry.updated_at = Some(Instant::now());
                            entry.last_used = Instant::now();
                        }
                        Err(err) => entry.error = Some(err.clone()),
                    }
                }
            }
        }

        result.and_then(|value| downcast(&value))
    }

    /// Run a mutation once and, on success, invalidate every listed prefix.
    pub async fn mutate<T, Fut>(&self, operation: Fut, invalidates: &[QueryKey]) -> MutationState<T>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let result = operation.await;
        if result.is_ok() {
            for prefix in invalidates {
                self.invalidate_queries(prefix);
            }
        }
        result.into()
    }

    /// Mark every entry under `prefix` stale and drop its in-flight fetch.
    /// Returns how many entries were touched.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries();
        let mut touched = 0;
        for (_, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            entry.stale = true;
            entry.in_flight = None;
            touched += 1;
        }
        debug!(prefix = %prefix, touched, "invalidated queries");
        touched
    }

    pub fn get_query_data<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries();
        entries
            .get(key)
            .and_then(|entry| entry.data.as_ref())
            .and_then(|data| data.downcast_ref::<T>().cloned())
    }

    pub fn set_query_data<T>(&self, key: QueryKey, data: T)
    where
        T: Send + Sync + 'static,
    {
        let mut entries = self.entries();
        collect_garbage(&mut entries, self.inner.defaults.gc_time);
        let entry = entries.entry(key).or_insert_with(Entry::new);
        entry.data = Some(Arc::new(data));
        entry.error = None;
        entry.stale = false;
        entry.updated_at = Some(Instant::now());
        entry.last_used = Instant::now();
    }

    /// Current cached state of `key` without fetching.
    pub fn query_state<T>(&self, key: &QueryKey) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let (fetching, error) = {
            let entries = self.entries();
            match entries.get(key) {
                Some(entry) => (entry.in_flight.is_some(), entry.error.clone()),
                None => (false, None),
            }
        };
        let data = self.get_query_data(key);
        match (data, error, fetching) {
            (None, _, true) => QueryState::loading(),
            (data, Some(err), false) => QueryState::error(err, data),
            (Some(data), _, _) => QueryState::success(data),
            (None, None, false) => QueryState::idle(None),
        }
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.entries()
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    /// True when the next read of `key` would refetch.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        let stale_time = self.inner.defaults.stale_time;
        self.entries()
            .get(key)
            .is_some_and(|entry| !entry.is_fresh(stale_time))
    }

    pub fn remove_queries(&self, prefix: &QueryKey) {
        self.entries().retain(|key, _| !key.starts_with(prefix));
    }

    /// Drop every entry. Fetches already running finish for their waiters
    /// only.
    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Drop idle entries. Entries with a fetch in flight are kept.
fn collect_garbage(entries: &mut HashMap<QueryKey, Entry>, gc_time: Duration) {
    let before = entries.len();
    entries.retain(|_, entry| entry.in_flight.is_some() || entry.last_used.elapsed() <= gc_time);
    let dropped = before - entries.len();
    if dropped > 0 {
        debug!(dropped, "collected idle queries");
    }
}

fn retry_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(16);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

async fn with_retry<T, F, Fut>(
    key: QueryKey,
    defaults: QueryDefaults,
    fetcher: F,
) -> Result<CachedValue, ApiError>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(Arc::new(value) as CachedValue),
            Err(err) if attempt < defaults.retry => {
                attempt += 1;
                let delay = retry_delay(defaults.retry_delay, attempt);
                debug!(key = %key, attempt, status = err.status, ?delay, "retrying query");
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                warn!(key = %key, status = err.status, message = %err.message, "query failed");
                return Err(err);
            }
        }
    }
}

fn downcast<T: Clone + 'static>(value: &CachedValue) -> Result<T, ApiError> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| ApiError::new("cached value has an unexpected type", 500))
}
