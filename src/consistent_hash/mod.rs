//! Consistent Hashing Module
//!
//! Maps keys onto a configured set of peers.
//!
//! Every peer is placed on a 32-bit ring `replicas` times (virtual nodes), which
//! evens out the share of keys each peer receives. A key belongs to the first
//! virtual node clockwise from its own hash. Adding or removing a peer only moves
//! the keys that fall on that peer's arcs.

pub mod ring;

pub use ring::{HashFn, HashRing};

#[cfg(test)]
mod tests;
