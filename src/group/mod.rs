//! Group Module
//!
//! A group is a named cache namespace: a local byte-bounded cache, a loader for
//! keys nobody has cached yet, and an optional peer picker.
//!
//! ## Lookup Path
//! 1. Empty keys are rejected.
//! 2. A local cache hit is returned directly.
//! 3. On a miss, the peer picker (if any) names the owning node; a remote fetch is attempted.
//!    A remote value is returned without being cached locally.
//! 4. When no peer applies or the remote fetch fails, the loader runs and its result is cached.
//!
//! ## Submodules
//! - **`group`**: The `Group` type and its lookup path.
//! - **`registry`**: Name → group lookup shared by the process.
//! - **`single_flight`**: Optional loader wrapper that collapses concurrent loads of one key.
//! - **`types`**: Loader type, error type and stats snapshot.

pub mod group;
pub mod registry;
pub mod single_flight;
pub mod types;

pub use group::Group;
pub use registry::GroupRegistry;
pub use types::{CacheError, GroupStats, LoaderFn};
