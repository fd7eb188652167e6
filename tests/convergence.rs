//! Ring convergence and finger table correctness over many joins.

use std::collections::HashSet;

use chordring::{Config, Error, NodeIndex, Ring, TickOrder};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Add up to `n` nodes with hashed addresses, skipping id collisions.
fn populate(ring: &mut Ring, n: usize) -> Vec<NodeIndex> {
    let mut nodes = Vec::with_capacity(n);
    let mut i = 0;

    while nodes.len() < n {
        match ring.add_node(&format!("192.168.1.{i}:6881")) {
            Ok(node) => nodes.push(node),
            Err(Error::IdCollision { .. }) => {}
            Err(error) => panic!("unexpected error: {error}"),
        }
        i += 1;
    }

    nodes
}

fn assert_single_cycle(ring: &Ring) {
    assert!(ring.is_consistent());

    for (index, _) in ring.nodes() {
        let walk = ring.walk(index).unwrap();

        assert_eq!(walk.len(), ring.len(), "walk from {index:?}");
        assert_eq!(walk.iter().collect::<HashSet<_>>().len(), ring.len());

        let last = ring.node(*walk.last().unwrap()).unwrap();
        assert_eq!(last.successor(), index);
    }
}

fn assert_fingers_correct(ring: &Ring) {
    for (index, node) in ring.nodes() {
        for (i, finger) in node.fingers().entries().iter().enumerate() {
            let target = node.fingers().target(i);

            assert_eq!(
                Some(*finger),
                ring.expected_successor(target),
                "finger {i} of {index:?} targeting {target:?}"
            );
        }
    }
}

#[test]
fn all_join_through_root() {
    let mut ring = Ring::default();
    let nodes = populate(&mut ring, 32);

    for node in &nodes[1..] {
        ring.join(*node, nodes[0]).unwrap();
    }

    ring.converge(300).unwrap();

    assert_single_cycle(&ring);
    assert_fingers_correct(&ring);

    // Every predecessor points back along the cycle.
    for (index, node) in ring.nodes() {
        let successor = ring.node(node.successor()).unwrap();
        assert_eq!(successor.predecessor(), Some(index));
    }
}

#[test]
fn joins_interleaved_with_maintenance() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut ring = Ring::new(Config {
        finger_table_size: 3,
        ..Default::default()
    })
    .unwrap();

    let nodes = populate(&mut ring, 11);
    ring.tick().unwrap();

    for (i, node) in nodes.iter().enumerate().skip(1) {
        let via = nodes[rng.gen_range(0..i)];
        ring.join(*node, via).unwrap();

        // Only nodes joined so far take part in this ring.
        for _ in 0..2 {
            ring.tick().unwrap();
        }
    }

    ring.converge(300).unwrap();

    assert_single_cycle(&ring);
    assert_fingers_correct(&ring);
}

#[test]
fn converges_in_any_tick_order() {
    for tick_order in [
        TickOrder::ReverseJoin,
        TickOrder::InsertionOrder,
        TickOrder::Shuffled,
    ] {
        let mut ring = Ring::new(Config {
            tick_order,
            ..Default::default()
        })
        .unwrap();
        let nodes = populate(&mut ring, 20);

        for node in &nodes[1..] {
            ring.join(*node, nodes[0]).unwrap();
        }

        ring.converge(300).unwrap();

        assert_single_cycle(&ring);
        assert_fingers_correct(&ring);
    }
}

#[test]
fn lookups_are_logarithmic_once_converged() {
    let mut ring = Ring::default();
    let nodes = populate(&mut ring, 64);

    for node in &nodes[1..] {
        ring.join(*node, nodes[0]).unwrap();
    }
    ring.converge(500).unwrap();

    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let from = nodes[rng.gen_range(0..nodes.len())];
        let target = chordring::Id::new(rng.gen_range(0..chordring::RING_SIZE)).unwrap();

        let route = ring.route(from, target).unwrap();

        assert_eq!(Some(route.node), ring.expected_successor(target));
        // 64 nodes, 12 fingers: at most one hop per finger level.
        assert!(route.hops <= 12, "{} hops", route.hops);
    }
}

#[test]
fn converged_ring_is_stable() {
    let mut ring = Ring::default();
    let nodes = populate(&mut ring, 10);

    for node in &nodes[1..] {
        ring.join(*node, nodes[0]).unwrap();
    }
    ring.converge(200).unwrap();

    let before = ring.info().unwrap();

    for _ in 0..5 {
        assert_eq!(ring.tick().unwrap().changes, 0);
    }

    let after = ring.info().unwrap();
    assert_eq!(before.nodes(), after.nodes());
    assert_eq!(after.ticks(), before.ticks() + 5);
}
