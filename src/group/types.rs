use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type-erased loader: produces the bytes for a key that is not cached anywhere.
pub type LoaderFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

/// Wraps an async closure into a `LoaderFn`.
pub fn loader_fn<F, Fut>(loader: F) -> LoaderFn
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
{
    Arc::new(move |key: String| {
        Box::pin(loader(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
    })
}

/// Errors surfaced to callers of `Group::get`.
///
/// Peer failures never show up here; they are logged and the group falls
/// back to its loader.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("key is required")]
    EmptyKey,

    #[error(transparent)]
    Loader(anyhow::Error),
}

/// Point-in-time counters for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub name: String,
    /// Every `get`, including rejected empty keys.
    pub gets: u64,
    pub hits: u64,
    /// Values served by a remote peer.
    pub peer_loads: u64,
    /// Remote fetches that failed and fell back to the loader.
    pub peer_errors: u64,
    pub local_loads: u64,
    pub local_load_errors: u64,
    pub cached_entries: usize,
    pub cached_bytes: usize,
}

#[derive(Debug, Default)]
pub(crate) struct GroupMetrics {
    pub gets: AtomicU64,
    pub hits: AtomicU64,
    pub peer_loads: AtomicU64,
    pub peer_errors: AtomicU64,
    pub local_loads: AtomicU64,
    pub local_load_errors: AtomicU64,
}

impl GroupMetrics {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}
