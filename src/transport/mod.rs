//! HTTP Peer Transport
//!
//! Reference binding of the peer capabilities over HTTP.
//!
//! ## Core Concepts
//! - **Outbound**: `HttpPool` implements `PeerPicker` on a consistent hash ring of peer base URLs and
//!   hands out one `HttpGetter` per peer. Getters issue a single `GET` per lookup (retried on
//!   connection errors) and turn every failure into an `Err`.
//! - **Inbound**: `handlers::peer_router` resolves `{base_path}/:group/:key`, looks up the group and
//!   answers from `Group::get_local`, so a peer request never fans out again.
//! - **Peer set**: configured explicitly via `HttpPool::set_peers`; there is no discovery.

pub mod handlers;
pub mod pool;
pub mod protocol;

pub use pool::{HttpGetter, HttpPool, HttpPoolConfig};
