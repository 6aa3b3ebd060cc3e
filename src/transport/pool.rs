use super::protocol::{
    DEFAULT_BASE_PATH, DEFAULT_REPLICAS, PEER_ATTEMPTS, PEER_BACKOFF, PEER_MAX_BACKOFF,
    PEER_TIMEOUT, normalize_base_path,
};
use crate::consistent_hash::{HashFn, HashRing};
use crate::peers::{FetchFuture, PeerGetter, PeerPicker};

use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Tuning knobs of an `HttpPool`.
#[derive(Clone)]
pub struct HttpPoolConfig {
    pub base_path: String,
    pub replicas: usize,
    /// Ring hash; CRC-32C when `None`.
    pub hash_fn: Option<HashFn>,
    pub timeout: Duration,
    /// Outbound calls per fetch, the first one included. Only connection
    /// failures and timeouts are retried, never an HTTP error status.
    pub attempts: usize,
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            hash_fn: None,
            timeout: PEER_TIMEOUT,
            attempts: PEER_ATTEMPTS,
        }
    }
}

struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

/// HTTP peer pool: picks owners on a consistent hash ring of peer base URLs
/// and fetches from them over HTTP.
///
/// Peer handles are base URLs such as `http://10.0.0.2:8008`. `self_addr` must
/// use the same form so this node recognizes its own keys.
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    config: HttpPoolConfig,
    http_client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    pub fn new(self_addr: &str) -> Arc<Self> {
        Self::with_config(self_addr, HttpPoolConfig::default())
    }

    pub fn with_config(self_addr: &str, config: HttpPoolConfig) -> Arc<Self> {
        let base_path = normalize_base_path(&config.base_path);
        let ring = HashRing::new(config.replicas, config.hash_fn.clone());

        Arc::new(Self {
            self_addr: self_addr.trim_end_matches('/').to_string(),
            base_path,
            config,
            http_client: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                ring,
                getters: HashMap::new(),
            }),
        })
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Replaces the peer set. The ring and the per-peer clients are rebuilt
    /// and swapped in under one lock.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().trim_end_matches('/').to_string())
            .collect();

        let mut ring = HashRing::new(self.config.replicas, self.config.hash_fn.clone());
        ring.add(&peers);

        let getters: HashMap<String, Arc<HttpGetter>> = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter {
                    base_url: format!("{}{}", peer, self.base_path),
                    http_client: self.http_client.clone(),
                    timeout: self.config.timeout,
                    attempts: self.config.attempts.max(1),
                };
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        let mut state = self.state.lock();
        state.ring = ring;
        state.getters = getters;

        tracing::info!("[server {}] peer set updated: {:?}", self.self_addr, peers);
    }

    /// Owner of `key` on the current ring, which may be this node.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        self.state.lock().ring.get(key).map(str::to_string)
    }

    pub fn peer_count(&self) -> usize {
        self.state.lock().getters.len()
    }
}

impl PeerPicker for HttpPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }

        tracing::debug!("[server {}] pick peer {} for key {}", self.self_addr, peer, key);
        let getter = state.getters.get(peer)?.clone();
        Some(getter as Arc<dyn PeerGetter>)
    }
}

/// Client side of one peer.
pub struct HttpGetter {
    base_url: String,
    http_client: reqwest::Client,
    timeout: Duration,
    attempts: usize,
}

impl HttpGetter {
    fn lookup_url(&self, group: &str, key: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Peer URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .push(group)
            .push(key);
        Ok(url)
    }

    async fn send(&self, url: &reqwest::Url) -> Result<reqwest::Response> {
        let mut backoff = PEER_BACKOFF;
        let mut attempt = 1;

        loop {
            let sent = self
                .http_client
                .get(url.clone())
                .timeout(self.timeout)
                .send()
                .await;

            match sent {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt >= self.attempts => return Err(e.into()),
                Err(e) => {
                    tracing::debug!(%url, attempt, error = %e, "peer call failed, retrying");
                    let jitter = Duration::from_millis(rand::random::<u64>() % 50);
                    tokio::time::sleep(backoff + jitter).await;
                    backoff = (backoff * 2).min(PEER_MAX_BACKOFF);
                    attempt += 1;
                }
            }
        }
    }

    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.lookup_url(group, key)?;
        let response = self.send(&url).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Peer returned {}", response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Reading response body: {}", e))?;
        Ok(body.to_vec())
    }
}

impl PeerGetter for HttpGetter {
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(group, key))
    }
}
