use super::byte_view::ByteView;
use super::lru::LruCache;

use parking_lot::Mutex;

/// A `LruCache<ByteView>` behind a mutex, safe to share between tasks.
///
/// The inner cache is only allocated on the first `add`, so a group that is
/// never written to costs nothing beyond this struct.
pub struct SharedCache {
    cache_bytes: usize,
    lru: Mutex<Option<LruCache<ByteView>>>,
}

impl SharedCache {
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            cache_bytes,
            lru: Mutex::new(None),
        }
    }

    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock();
        guard
            .get_or_insert_with(|| LruCache::new(self.cache_bytes))
            .add(key, value);
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.lru.lock();
        guard.as_mut()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lru.lock().as_ref().map(|lru| lru.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> usize {
        self.lru
            .lock()
            .as_ref()
            .map(|lru| lru.used_bytes())
            .unwrap_or(0)
    }

    pub fn cache_bytes(&self) -> usize {
        self.cache_bytes
    }
}
