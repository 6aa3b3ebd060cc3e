//! Peer Transport Protocol
//!
//! Path layout and defaults shared by the outbound client and the inbound
//! handler.
//!
//! A peer lookup is `GET {peer}{base_path}/{group}/{key}` with `group` and `key`
//! each percent-escaped as a single path segment. A successful answer is
//! `200 OK` with the raw value bytes as an `application/octet-stream` body.

use std::time::Duration;

/// Prefix under which every node serves peer lookups.
pub const DEFAULT_BASE_PATH: &str = "/_flexcache";
/// Virtual nodes per peer on the hash ring.
pub const DEFAULT_REPLICAS: usize = crate::consistent_hash::ring::DEFAULT_REPLICAS;
/// Per-attempt timeout of an outbound peer lookup.
pub const PEER_TIMEOUT: Duration = Duration::from_millis(500);
/// Outbound calls per peer lookup. Raise through `HttpPoolConfig::attempts`
/// to retry connection failures.
pub const PEER_ATTEMPTS: usize = 1;
/// First pause between retried attempts; doubles up to `PEER_MAX_BACKOFF`.
pub const PEER_BACKOFF: Duration = Duration::from_millis(150);
pub const PEER_MAX_BACKOFF: Duration = Duration::from_millis(1200);

/// Public endpoint for client lookups through the distributed path.
pub const ENDPOINT_API: &str = "/api";
/// Public endpoint exposing per-group counters.
pub const ENDPOINT_STATS: &str = "/stats";

pub const CONTENT_TYPE_BYTES: &str = "application/octet-stream";

/// Normalizes a base path to `/segment[/segment...]` with no trailing slash.
pub fn normalize_base_path(base_path: &str) -> String {
    let cleaned = base_path.trim_end_matches('/');
    if cleaned.is_empty() {
        String::new()
    } else if cleaned.starts_with('/') {
        cleaned.to_string()
    } else {
        format!("/{}", cleaned)
    }
}
