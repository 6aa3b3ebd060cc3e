//! Local Cache Module
//!
//! Holds the node-local storage layer of a group.
//!
//! ## Core Concepts
//! - **ByteView**: Immutable byte payload. Every accessor that hands bytes to a caller copies them.
//! - **LruCache**: Single-threaded, byte-bounded least-recently-used store with an eviction callback.
//! - **SharedCache**: Mutex-guarded `LruCache<ByteView>`, built lazily on the first write.

pub mod byte_view;
pub mod concurrent;
pub mod lru;
