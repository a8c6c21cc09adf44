//! Key-indexed query cache.
//!
//! # Design
//! Results are stored per [`QueryKey`] as type-erased values. Concurrent
//! reads of the same key share one in-flight future, so a key is fetched at
//! most once at a time. Invalidation marks every entry under a key prefix as
//! stale and forgets its in-flight fetch; a fetch that was forgotten still
//! answers its own waiters but never writes back into the cache.
//!
//! Data is served from the cache only while younger than
//! [`QueryDefaults::stale_time`] (zero by default, so reads refetch), and
//! entries left untouched for [`QueryDefaults::gc_time`] are dropped on the
//! next cache access. Failed query fetches are retried with a doubling
//! delay.

mod client;
mod key;
mod state;

pub use client::{QueryClient, QueryDefaults};
pub use key::QueryKey;
pub use state::{MutationState, MutationStatus, QueryState, QueryStatus};
