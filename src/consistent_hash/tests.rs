//! Consistent Hash Ring Tests
//!
//! ## Test Scopes
//! - **Placement**: Ownership follows the first virtual node at or after the key's hash, with wrap-around.
//! - **Stability**: Lookups are deterministic for a fixed peer set.
//! - **Rebalancing**: Adding a peer only moves keys onto that peer.
//! - **Distribution**: Virtual nodes spread keys evenly over a small cluster.

#[cfg(test)]
mod tests {
    use crate::consistent_hash::ring::DEFAULT_REPLICAS;
    use crate::consistent_hash::{HashFn, HashRing};
    use rand::Rng;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Treats the input as a decimal number so ring positions are predictable.
    fn numeric_hash() -> HashFn {
        Arc::new(|data: &[u8]| {
            std::str::from_utf8(data)
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0)
        })
    }

    #[test]
    fn test_empty_ring_returns_none() {
        let ring = HashRing::new(3, None);

        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
        assert_eq!(ring.peer_count(), 0);
    }

    #[test]
    fn test_ring_placement_and_wrap_around() {
        // ARRANGE: positions 2, 4, 6, 12, 14, 16, 22, 24, 26
        let mut ring = HashRing::new(3, Some(numeric_hash()));
        ring.add(["6", "4", "2"]);

        // ASSERT
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, expected) in cases {
            assert_eq!(ring.get(key), Some(expected), "key {} should map to {}", key, expected);
        }
        assert_eq!(ring.peer_count(), 3);
        assert_eq!(ring.replicas(), 3);
    }

    #[test]
    fn test_adding_peer_only_claims_its_own_arcs() {
        let mut ring = HashRing::new(3, Some(numeric_hash()));
        ring.add(["6", "4", "2"]);

        // ACT: positions 8, 18, 28 join the ring
        ring.add(["8"]);

        // ASSERT: 27 now lands on 28, everything else is unchanged
        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "8")];
        for (key, expected) in cases {
            assert_eq!(ring.get(key), Some(expected), "key {} should map to {}", key, expected);
        }
    }

    #[test]
    fn test_re_adding_peers_keeps_assignments() {
        let mut ring = HashRing::new(3, Some(numeric_hash()));
        ring.add(["6", "4", "2"]);
        let before: Vec<_> = (0..30)
            .map(|i| ring.get(&i.to_string()).map(str::to_string))
            .collect();

        ring.add(["6", "4", "2"]);
        let after: Vec<_> = (0..30)
            .map(|i| ring.get(&i.to_string()).map(str::to_string))
            .collect();

        assert_eq!(before, after);
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
        ring.add(["node1", "node2", "node3"]);

        for i in 0..1000 {
            let key = format!("book_{}", i);
            assert_eq!(ring.get(&key), ring.get(&key));
        }
    }

    #[test]
    fn test_new_peer_only_takes_keys_from_others() {
        // ARRANGE
        let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
        ring.add(["node1", "node2", "node3"]);
        let keys: Vec<String> = (0..5000).map(|i| format!("key_{}", i)).collect();
        let before: HashMap<&str, String> = keys
            .iter()
            .map(|k| (k.as_str(), ring.get(k).unwrap().to_string()))
            .collect();

        // ACT
        ring.add(["node4"]);

        // ASSERT: a key either stays put or moves to the new peer
        let mut moved = 0;
        for key in &keys {
            let owner = ring.get(key).unwrap();
            if owner != before[key.as_str()] {
                assert_eq!(owner, "node4", "key {} moved between old peers", key);
                moved += 1;
            }
        }
        assert!(moved > 0, "The new peer should take over some keys");
        assert!(moved < keys.len() / 2, "Too many keys remapped: {}", moved);
    }

    #[test]
    fn test_distribution_across_three_peers() {
        let mut ring = HashRing::new(DEFAULT_REPLICAS, None);
        ring.add(["node1", "node2", "node3"]);

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut rng = rand::thread_rng();
        let total = 10_000;
        for _ in 0..total {
            let key = format!("key-{}", rng.r#gen::<u64>());
            *counts.entry(ring.get(&key).unwrap().to_string()).or_insert(0) += 1;
        }

        // Each peer should get 1/3 of the keys, within 20%.
        let expected = total as f64 / 3.0;
        assert_eq!(counts.len(), 3);
        for (peer, count) in counts {
            let ratio = count as f64 / expected;
            assert!(
                (0.8..=1.2).contains(&ratio),
                "Peer {} received {} keys (ratio {:.2})",
                peer,
                count,
                ratio
            );
        }
    }
}
