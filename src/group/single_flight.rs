//! Single-Flight Loader Layer
//!
//! `Group` does not deduplicate concurrent misses: two callers missing the same
//! key at the same time both run the loader. Applications that need one load
//! per key can wrap their loader in a `SingleFlight`; callers arriving while a
//! load is running wait for it and share its result.

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

type SharedResult = Result<Vec<u8>, Arc<anyhow::Error>>;

#[derive(Default)]
pub struct SingleFlight {
    calls: DashMap<String, Arc<OnceCell<SharedResult>>>,
}

impl SingleFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Runs `load` for `key` unless a load for the same key is already in
    /// flight, in which case the result of that load is returned instead.
    pub async fn run<F, Fut>(&self, key: &str, load: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>>>,
    {
        let call = Arc::clone(
            self.calls
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        let result = call
            .get_or_init(|| async move { load().await.map_err(Arc::new) })
            .await
            .clone();

        // Only the call that is still registered gets removed; a newer one may
        // already have taken its place.
        self.calls.remove_if(key, |_, current| Arc::ptr_eq(current, &call));

        result.map_err(|e| anyhow::anyhow!("{:#}", e))
    }

    /// Number of keys with a load currently in progress.
    pub fn in_flight(&self) -> usize {
        self.calls.len()
    }
}
