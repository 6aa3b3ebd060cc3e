use std::collections::HashMap;
use std::sync::Arc;

/// Hash function used to place keys and virtual nodes on the ring.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Number of virtual nodes per peer when the caller has no preference.
pub const DEFAULT_REPLICAS: usize = 50;

pub fn default_hash() -> HashFn {
    Arc::new(crc32c::crc32c)
}

pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node positions.
    positions: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Builds an empty ring. `hash` falls back to CRC-32C when `None`.
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Self {
        Self {
            hash: hash.unwrap_or_else(default_hash),
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
        }
    }

    /// Places `replicas` virtual nodes for each peer, at `hash("{i}{peer}")`.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{}{}", i, peer).as_bytes());
                self.positions.push(position);
                self.owners.insert(position, peer.to_string());
            }
        }
        self.positions.sort_unstable();
        self.positions.dedup();
    }

    /// Returns the peer owning `key`, or `None` when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < hash);
        let position = self.positions[idx % self.positions.len()];

        self.owners.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of distinct real peers on the ring.
    pub fn peer_count(&self) -> usize {
        let mut peers: Vec<&str> = self.owners.values().map(String::as_str).collect();
        peers.sort_unstable();
        peers.dedup();
        peers.len()
    }
}
