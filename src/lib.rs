//! Distributed In-Process Byte Cache
//!
//! This library crate defines the caching and distribution engine. The binary
//! (`main.rs`) wires it to an HTTP listener and a demo data source.
//!
//! ## Architecture Modules
//! - **`cache`**: Node-local storage. `ByteView` values in a byte-bounded LRU behind a mutex.
//! - **`consistent_hash`**: Hash ring with virtual nodes mapping keys to peer identifiers.
//! - **`group`**: Named namespaces with a loader, the lookup path (cache → owning peer → loader),
//!   the group registry and an optional single-flight loader layer.
//! - **`peers`**: The `PeerPicker` / `PeerGetter` capabilities a group uses to reach other nodes.
//! - **`transport`**: HTTP binding of those capabilities (reqwest client, axum handlers).

pub mod cache;
pub mod consistent_hash;
pub mod group;
pub mod peers;
pub mod transport;

pub use cache::byte_view::ByteView;
pub use group::{CacheError, Group, GroupRegistry};
