//! Group Registry
//!
//! Owns every `Group` of a process and resolves them by name. Lookups share a
//! read lock; creating a group takes the write lock and so excludes lookups
//! and other creations.

use super::group::Group;
use super::types::{GroupStats, LoaderFn, loader_fn};

use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a group named `name` with a byte budget of `cache_bytes`
    /// (zero for unbounded) and registers it.
    ///
    /// A group previously registered under the same name is replaced.
    pub fn new_group<F, Fut>(&self, name: &str, cache_bytes: usize, loader: F) -> Arc<Group>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        self.new_group_with_loader(name, cache_bytes, loader_fn(loader))
    }

    /// Same as `new_group`, for a loader that is already type-erased.
    pub fn new_group_with_loader(
        &self,
        name: &str,
        cache_bytes: usize,
        loader: LoaderFn,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(name, cache_bytes, loader));

        let mut groups = self.groups.write();
        if groups.insert(name.to_string(), group.clone()).is_some() {
            tracing::warn!("Replaced existing group: {}", name);
        } else {
            tracing::info!("Created group {} ({} bytes)", name, cache_bytes);
        }

        group
    }

    /// Returns the named group, or `None` if it was never created.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns the names of all registered groups, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }

    /// Collects a stats snapshot for every group, sorted by name.
    pub fn stats(&self) -> Vec<GroupStats> {
        let groups: Vec<Arc<Group>> = self.groups.read().values().cloned().collect();
        let mut stats: Vec<GroupStats> = groups.iter().map(|group| group.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }
}
