use super::types::{CacheError, GroupMetrics, GroupStats, LoaderFn};
use crate::cache::byte_view::ByteView;
use crate::cache::concurrent::SharedCache;
use crate::peers::{PeerGetter, PeerPicker};

use std::sync::{Arc, OnceLock};

/// A named cache namespace.
///
/// Owns the local cache and the loader, and optionally a peer picker used to
/// route misses to the node that owns the key.
pub struct Group {
    name: String,
    loader: LoaderFn,
    main_cache: SharedCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    metrics: GroupMetrics,
}

impl Group {
    pub(crate) fn new(name: &str, cache_bytes: usize, loader: LoaderFn) -> Self {
        Self {
            name: name.to_string(),
            loader,
            main_cache: SharedCache::new(cache_bytes),
            peers: OnceLock::new(),
            metrics: GroupMetrics::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs the peer picker used on cache misses.
    ///
    /// # Panics
    /// If a picker was already registered for this group. That is a wiring
    /// bug, not something to recover from at runtime.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
        tracing::info!("Registered peer picker for group {}", self.name);
    }

    pub fn has_peers(&self) -> bool {
        self.peers.get().is_some()
    }

    /// Returns the value for `key`, from the local cache, the owning peer or
    /// the loader, in that order.
    ///
    /// Values fetched from a peer are returned as-is and not cached here.
    pub async fn get(&self, key: &str) -> Result<ByteView, CacheError> {
        GroupMetrics::incr(&self.metrics.gets);
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.load(key).await
    }

    /// Like `get`, but never consults peers.
    ///
    /// Used when serving another node's request, so a request can't bounce
    /// between peers.
    pub async fn get_local(&self, key: &str) -> Result<ByteView, CacheError> {
        GroupMetrics::incr(&self.metrics.gets);
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.get_locally(key).await
    }

    pub fn stats(&self) -> GroupStats {
        GroupStats {
            name: self.name.clone(),
            gets: GroupMetrics::read(&self.metrics.gets),
            hits: GroupMetrics::read(&self.metrics.hits),
            peer_loads: GroupMetrics::read(&self.metrics.peer_loads),
            peer_errors: GroupMetrics::read(&self.metrics.peer_errors),
            local_loads: GroupMetrics::read(&self.metrics.local_loads),
            local_load_errors: GroupMetrics::read(&self.metrics.local_load_errors),
            cached_entries: self.main_cache.len(),
            cached_bytes: self.main_cache.used_bytes(),
        }
    }

    fn lookup_cache(&self, key: &str) -> Option<ByteView> {
        match self.main_cache.get(key) {
            Some(value) => {
                GroupMetrics::incr(&self.metrics.hits);
                tracing::debug!(group = %self.name, key, "cache hit");
                Some(value)
            }
            None => {
                tracing::debug!(group = %self.name, key, "cache miss");
                None
            }
        }
    }

    async fn load(&self, key: &str) -> Result<ByteView, CacheError> {
        if let Some(picker) = self.peers.get()
            && let Some(peer) = picker.pick_peer(key)
        {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => {
                    GroupMetrics::incr(&self.metrics.peer_loads);
                    return Ok(value);
                }
                Err(e) => {
                    GroupMetrics::incr(&self.metrics.peer_errors);
                    tracing::warn!(
                        group = %self.name,
                        key,
                        "Failed to get from peer, loading locally: {:#}",
                        e
                    );
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> anyhow::Result<ByteView> {
        let bytes = peer.fetch(&self.name, key).await?;
        Ok(ByteView::from_vec(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView, CacheError> {
        let bytes = match (self.loader)(key.to_string()).await {
            Ok(bytes) => bytes,
            Err(e) => {
                GroupMetrics::incr(&self.metrics.local_load_errors);
                return Err(CacheError::Loader(e));
            }
        };
        GroupMetrics::incr(&self.metrics.local_loads);
        tracing::debug!(group = %self.name, key, bytes = bytes.len(), "loaded from source");

        let value = ByteView::new(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }
}
