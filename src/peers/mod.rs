//! Peer Capabilities
//!
//! The two narrow seams a `Group` uses to reach the rest of the cluster:
//!
//! - **`PeerPicker`**: chooses which peer, if any, owns a key.
//! - **`PeerGetter`**: fetches a key of a named group from one specific peer.
//!
//! Any implementation (HTTP pool, in-memory map, test double) can be plugged in.

use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by `PeerGetter::fetch`.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Selects the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns `None` when the key should be served locally, either because no
    /// peer is configured or because this node owns it.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Performs a remote lookup against a single peer.
///
/// Every transport problem (unreachable peer, non-success status, unreadable
/// body) must come back as an `Err`.
pub trait PeerGetter: Send + Sync {
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a>;
}
