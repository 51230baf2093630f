//! Remapping behaviour under membership changes.
//!
//! Recorded scenarios pin exact placements for the fixed hash functions;
//! property tests check the consistent-hashing guarantees for arbitrary
//! node sets.

use std::sync::Arc;

use corelib::partitioner::{Md5Partitioner, Murmur3Partitioner, Partitioner};
use corelib::ring::{HashRing, RingSnapshot};
use corelib::{NodeId, Remap};
use proptest::prelude::*;

fn demo_keys() -> Vec<String> {
    (1..=10).map(|i| format!("Key{i}")).collect()
}

fn owners(ring: &HashRing, keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|key| ring.locate(key).unwrap().to_string())
        .collect()
}

fn ring_with(partitioner: Arc<dyn Partitioner>, nodes: &[&str], vnodes: usize) -> HashRing {
    HashRing::with_nodes(nodes.iter().copied(), vnodes, partitioner).unwrap()
}

/// Owner of `key` once every position held by `removed` is skipped.
fn successor_skipping(snapshot: &RingSnapshot, key: &str, removed: &str) -> Option<NodeId> {
    let partitioner = Murmur3Partitioner::new();
    let token = partitioner.partition(key.as_bytes());
    let positions = snapshot.positions();
    positions
        .range(token..)
        .chain(positions.iter())
        .map(|(_, node)| node)
        .find(|node| node.as_str() != removed)
        .cloned()
}

// ============================================================================
// Recorded Scenarios
// ============================================================================

#[test]
fn test_murmur3_demo_scenario() {
    let keys = demo_keys();
    let ring = ring_with(
        Arc::new(Murmur3Partitioner::new()),
        &["NodeA", "NodeB", "NodeC"],
        5,
    );
    assert_eq!(ring.position_count(), 15);

    let initial = owners(&ring, &keys);
    assert_eq!(
        initial,
        ["NodeC", "NodeA", "NodeC", "NodeB", "NodeC", "NodeA", "NodeC", "NodeA", "NodeB", "NodeB"]
    );

    // NodeD's five arcs contain none of these ten keys.
    let before = ring.snapshot();
    assert_eq!(ring.add_node("NodeD"), 0);
    assert!(before.owner_changes(&ring.snapshot(), &keys).is_empty());
    assert_eq!(owners(&ring, &keys), initial);

    let before = ring.snapshot();
    assert_eq!(ring.remove_node("NodeB"), 5);
    assert_eq!(
        owners(&ring, &keys),
        ["NodeC", "NodeA", "NodeC", "NodeA", "NodeC", "NodeA", "NodeC", "NodeA", "NodeC", "NodeA"]
    );

    let remaps = before.owner_changes(&ring.snapshot(), &keys);
    let moved: Vec<&str> = remaps.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(moved, ["Key4", "Key9", "Key10"]);
    assert!(remaps
        .iter()
        .all(|r| r.from.as_ref().is_some_and(|from| from == "NodeB")));
}

#[test]
fn test_md5_demo_scenario() {
    let keys = demo_keys();
    let ring = ring_with(
        Arc::new(Md5Partitioner::md5()),
        &["NodeA", "NodeB", "NodeC"],
        5,
    );

    assert_eq!(
        owners(&ring, &keys),
        ["NodeB", "NodeA", "NodeB", "NodeB", "NodeC", "NodeA", "NodeC", "NodeA", "NodeA", "NodeC"]
    );

    let before = ring.snapshot();
    ring.add_node("NodeD");
    assert_eq!(
        before.owner_changes(&ring.snapshot(), &keys),
        vec![Remap {
            key: "Key9".into(),
            from: Some(NodeId::from("NodeA")),
            to: Some(NodeId::from("NodeD")),
        }]
    );

    ring.remove_node("NodeB");
    assert_eq!(
        owners(&ring, &keys),
        ["NodeA", "NodeA", "NodeA", "NodeA", "NodeC", "NodeA", "NodeC", "NodeA", "NodeD", "NodeC"]
    );
}

#[test]
fn test_murmur3_compat_scenario() {
    let keys: Vec<String> = ["user123", "product456", "order789", "order7899", "order7897"]
        .map(String::from)
        .to_vec();
    let ring = HashRing::with_separator(Arc::new(Murmur3Partitioner::compat()), 5, "VN").unwrap();
    for node in ["NodeA", "NodeB", "NodeC"] {
        ring.add_node(node);
    }
    assert_eq!(ring.position_count(), 15);
    assert_eq!(
        ring.placements("NodeA")[0].token,
        corelib::Token(1_604_915)
    );
    assert_eq!(owners(&ring, &keys), ["NodeB", "NodeC", "NodeC", "NodeA", "NodeA"]);

    ring.add_node("NodeD");
    assert_eq!(owners(&ring, &keys), ["NodeB", "NodeD", "NodeC", "NodeD", "NodeD"]);
}

#[test]
fn test_add_moves_about_one_nth_of_keys() {
    let keys: Vec<String> = (0..10_000).map(|i| format!("key-{i}")).collect();
    let ring = ring_with(
        Arc::new(Murmur3Partitioner::new()),
        &["node-0", "node-1", "node-2"],
        128,
    );
    let before = ring.snapshot();
    ring.add_node("node-3");

    let remaps = before.owner_changes(&ring.snapshot(), &keys);
    let fraction = remaps.len() as f64 / keys.len() as f64;
    // Expectation is 1/4 of the keys.
    assert!((0.15..0.35).contains(&fraction), "moved fraction {fraction}");
    assert!(remaps
        .iter()
        .all(|r| r.to.as_ref().is_some_and(|to| to == "node-3")));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: a new node only takes keys, it never shuffles others.
    #[test]
    fn prop_add_only_steals_keys(
        node_count in 1usize..6,
        vnodes in 1usize..24,
        keys in prop::collection::vec("[a-zA-Z0-9]{1,12}", 1..64)
    ) {
        let nodes: Vec<String> = (0..node_count).map(|i| format!("node-{i}")).collect();
        let ring = HashRing::with_nodes(&nodes, vnodes, Arc::new(Murmur3Partitioner::new())).unwrap();
        let before = ring.snapshot();
        ring.add_node("joiner");
        let after = ring.snapshot();

        for remap in before.owner_changes(&after, &keys) {
            prop_assert_eq!(remap.to, Some(NodeId::from("joiner")));
        }
    }

    /// Property: keys owned by a removed node move to its clockwise
    /// successor; all other keys stay put.
    #[test]
    fn prop_remove_moves_only_removed_nodes_keys(
        node_count in 2usize..6,
        vnodes in 1usize..24,
        victim in 0usize..6,
        keys in prop::collection::vec("[a-zA-Z0-9]{1,12}", 1..64)
    ) {
        let nodes: Vec<String> = (0..node_count).map(|i| format!("node-{i}")).collect();
        let victim = nodes[victim % node_count].clone();
        let ring = HashRing::with_nodes(&nodes, vnodes, Arc::new(Murmur3Partitioner::new())).unwrap();
        let before = ring.snapshot();
        ring.remove_node(&victim);
        let after = ring.snapshot();

        for key in &keys {
            let old = before.lookup(key).cloned();
            let new = after.lookup(key).cloned();
            if old.as_ref().is_some_and(|o| o == victim.as_str()) {
                prop_assert_eq!(new, successor_skipping(&before, key, &victim));
            } else {
                prop_assert_eq!(new, old);
            }
        }
    }

    /// Property: lookups are a pure function of topology and key.
    #[test]
    fn prop_identical_rings_agree(
        vnodes in 1usize..32,
        key in ".{0,24}"
    ) {
        let a = HashRing::with_nodes(["x", "y", "z"], vnodes, Arc::new(Murmur3Partitioner::new())).unwrap();
        let b = HashRing::with_nodes(["x", "y", "z"], vnodes, Arc::new(Murmur3Partitioner::new())).unwrap();
        prop_assert_eq!(a.locate(&key).unwrap(), b.locate(&key).unwrap());
        prop_assert!(a.position_count() <= 3 * vnodes);
    }
}
