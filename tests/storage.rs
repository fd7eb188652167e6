//! Key ownership and put/get round trips over a converged ring.

use chordring::{Bytes, Error, Id, Lookup, NodeIndex, Ring, RING_SIZE};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn converged(n: usize) -> (Ring, Vec<NodeIndex>) {
    let mut ring = Ring::default();
    let mut nodes = Vec::with_capacity(n);
    let mut i = 0;

    while nodes.len() < n {
        if let Ok(node) = ring.add_node(&format!("storage-{i}")) {
            nodes.push(node);
        }
        i += 1;
    }

    for node in &nodes[1..] {
        ring.join(*node, nodes[0]).unwrap();
    }
    ring.converge(300).unwrap();

    (ring, nodes)
}

/// Node whose arc `(predecessor, node]` contains `target`, by linear scan.
fn arc_owner(ring: &Ring, target: Id) -> NodeIndex {
    let mut ids: Vec<(Id, NodeIndex)> = ring.nodes().map(|(i, n)| (n.id(), i)).collect();
    ids.sort();

    for (position, (id, index)) in ids.iter().enumerate() {
        let previous = ids[(position + ids.len() - 1) % ids.len()].0;

        if chordring::KeyRange::new(previous, *id).contains_id(target) {
            return *index;
        }
    }

    unreachable!("arcs cover the whole ring")
}

#[test]
fn recursive_lookup_resolves_to_arc_owner() {
    let (mut ring, nodes) = converged(16);

    for key in 0..2000u32 {
        let key = key.to_string();
        let from = nodes[key.len() % nodes.len()];
        let owner = arc_owner(&ring, Id::for_key(key.as_bytes()));

        assert_eq!(ring.find_key_owner(from, key.as_bytes()).unwrap(), owner);
        assert_eq!(
            ring.put(from, &key, key.clone(), Lookup::Recursive).unwrap(),
            owner
        );
    }

    // The same keys are found from any other node.
    for key in (0..2000u32).step_by(7) {
        let key = key.to_string();
        let from = nodes[(key.len() + 3) % nodes.len()];

        assert_eq!(ring.get(from, &key, Lookup::Recursive).unwrap(), key);
    }
}

#[test]
fn round_trip_both_lookups() {
    let (mut ring, nodes) = converged(11);
    let root = nodes[0];
    let mut rng = StdRng::seed_from_u64(1);

    for lookup in [Lookup::SingleHop, Lookup::Recursive] {
        let values: Vec<i64> = (0..10_000)
            .map(|i| match i % 4 {
                0 => rng.gen_range(-255..=255),
                1 => i64::MIN + i,
                2 => i64::MAX - i,
                _ => rng.gen(),
            })
            .collect();

        for (i, value) in values.iter().enumerate() {
            let key = format!("{lookup:?}-{i}");
            ring.put(root, &key, value.to_be_bytes().to_vec(), lookup)
                .unwrap();
        }

        for (i, value) in values.iter().enumerate() {
            let key = format!("{lookup:?}-{i}");
            let bytes = ring.get(root, &key, lookup).unwrap();

            assert_eq!(bytes, Bytes::copy_from_slice(&value.to_be_bytes()));
        }
    }

    let stored: usize = ring.nodes().map(|(_, n)| n.stored()).sum();
    assert_eq!(stored, 20_000);
}

#[test]
fn single_hop_only_consults_the_caller() {
    let (ring, nodes) = converged(8);

    for key in 0..500u32 {
        let key = key.to_be_bytes();

        for from in &nodes {
            let node = ring.find_key_node(*from, &key).unwrap();
            let fingers = ring.node(*from).unwrap().fingers();

            assert!(
                node == *from || fingers.entries().contains(&node),
                "single hop from {from:?} must land on one of its own fingers"
            );
        }
    }
}

#[test]
fn missing_key_is_an_error() {
    let (ring, nodes) = converged(4);

    for lookup in [Lookup::SingleHop, Lookup::Recursive] {
        assert_eq!(
            ring.get(nodes[1], "never written", lookup),
            Err(Error::MissingKey(b"never written".to_vec().into()))
        );
    }
}

#[test]
fn two_node_scenario() {
    let mut ring = Ring::default();
    let a = ring.add_node_with_id("node-10", Id::new(10).unwrap()).unwrap();
    let b = ring
        .add_node_with_id("node-500", Id::new(500).unwrap())
        .unwrap();

    assert_eq!(RING_SIZE, 4096);

    ring.cohere(a).unwrap();
    ring.join(b, a).unwrap();

    for _ in 0..2 {
        ring.tick().unwrap();
    }

    let node_a = ring.node(a).unwrap();
    let node_b = ring.node(b).unwrap();

    assert_eq!(node_a.successor(), b);
    assert_eq!(node_b.successor(), a);
    assert_eq!(node_a.predecessor(), Some(b));
    assert_eq!(node_b.predecessor(), Some(a));

    // 11..=500 belong to node-500, the rest wraps around to node-10.
    assert_eq!(ring.find_successor(a, Id::new(11).unwrap()).unwrap(), b);
    assert_eq!(ring.find_successor(a, Id::new(500).unwrap()).unwrap(), b);
    assert_eq!(ring.find_successor(b, Id::new(501).unwrap()).unwrap(), a);
    assert_eq!(ring.find_successor(b, Id::new(10).unwrap()).unwrap(), a);
}
