//! Ring maintenance driver.
//!
//! The stabilization protocol never reports that the ring is consistent, so
//! convergence is observed from outside by walking successor pointers.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use tracing::debug;

use super::Ring;
use crate::common::{Id, NodeIndex, RING_SIZE};
use crate::{Error, Result, TickOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Summary of a single maintenance tick.
pub struct TickReport {
    /// Nodes that ran `cohere`.
    pub visited: usize,
    /// Successor, predecessor and finger entries that changed.
    pub changes: usize,
}

impl Ring {
    /// Run `cohere` on every node once, in the configured [TickOrder].
    pub fn tick(&mut self) -> Result<TickReport> {
        let mut order: Vec<NodeIndex> = (0..self.nodes.len()).map(NodeIndex).collect();

        match self.config.tick_order {
            TickOrder::ReverseJoin => order.reverse(),
            TickOrder::InsertionOrder => {}
            TickOrder::Shuffled => order.shuffle(&mut rand::thread_rng()),
        }

        let mut changes = 0;

        for node in &order {
            changes += self.cohere(*node)?;
        }

        self.ticks += 1;

        Ok(TickReport {
            visited: order.len(),
            changes,
        })
    }

    /// Tick until the ring is consistent and a full tick changes nothing.
    ///
    /// Returns the number of ticks applied, or [Error::NotConverged] after `max_rounds`.
    pub fn converge(&mut self, max_rounds: usize) -> Result<usize> {
        for round in 1..=max_rounds {
            let report = self.tick()?;

            if report.changes == 0 && self.is_consistent() {
                debug!(rounds = round, nodes = self.len(), "Ring converged");

                return Ok(round);
            }
        }

        debug!(rounds = max_rounds, nodes = self.len(), "Ring did not converge");

        Err(Error::NotConverged { rounds: max_rounds })
    }

    /// Follow successor pointers from `from` until it is reached again,
    /// or until a node repeats.
    pub fn walk(&self, from: NodeIndex) -> Result<Vec<NodeIndex>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let mut current = from;

        while visited.insert(current) {
            path.push(current);
            current = self.node(current)?.successor();
        }

        Ok(path)
    }

    /// Returns `true` if successor pointers form one cycle through every node,
    /// going around the ring exactly once in identifier order.
    pub fn is_consistent(&self) -> bool {
        let origin = NodeIndex(0);

        let path = match self.walk(origin) {
            Ok(path) => path,
            Err(_) => return self.is_empty(),
        };

        if path.len() != self.len() {
            return false;
        }

        let closes = match path.last().and_then(|last| self.node(*last).ok()) {
            Some(last) => last.successor() == origin,
            None => false,
        };

        if !closes {
            return false;
        }

        if path.len() == 1 {
            return true;
        }

        // With distinct ids, one lap around the ring in clockwise order
        // covers exactly RING_SIZE identifiers.
        let lap: u64 = path
            .iter()
            .filter_map(|n| {
                let node = self.node(*n).ok()?;
                let successor = self.node(node.successor()).ok()?;

                Some(node.id().distance(&successor.id()))
            })
            .sum();

        lap == RING_SIZE
    }

    /// Brute-force owner of `target`: the node with the first id at or after it,
    /// ignoring every ring pointer.
    pub fn expected_successor(&self, target: Id) -> Option<NodeIndex> {
        self.nodes()
            .min_by_key(|(_, node)| target.distance(&node.id()))
            .map(|(index, _)| index)
    }
}
