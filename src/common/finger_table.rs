//! Chord finger table

use std::iter::Rev;
use std::slice::Iter;

use crate::common::{Id, NodeIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Routing shortcuts of a single node.
///
/// Entry `i` is meant to reference the successor of `(owner + 2^i) mod RING_SIZE`,
/// and always references _some_ node of the ring.
pub struct FingerTable {
    owner: Id,
    entries: Box<[NodeIndex]>,
}

impl FingerTable {
    /// Create a new [FingerTable] of `size` self-references.
    pub fn new(owner: Id, this: NodeIndex, size: usize) -> Self {
        FingerTable {
            owner,
            entries: vec![this; size].into(),
        }
    }

    // === Getters ===

    /// Returns the [Id] of the node owning this table.
    pub fn owner(&self) -> Id {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<NodeIndex> {
        self.entries.get(i).copied()
    }

    /// Identifier entry `i` should point at the successor of.
    pub fn target(&self, i: usize) -> Id {
        self.owner.finger_target(i)
    }

    pub fn entries(&self) -> &[NodeIndex] {
        &self.entries
    }

    // === Public Methods ===

    /// Replace entry `i`, returning `true` if it changed.
    pub fn set(&mut self, i: usize, node: NodeIndex) -> bool {
        match self.entries.get_mut(i) {
            Some(entry) if *entry != node => {
                *entry = node;
                true
            }
            _ => false,
        }
    }

    /// Iterate from the largest stride down to the smallest.
    pub fn iter_descending(&self) -> Rev<Iter<'_, NodeIndex>> {
        self.entries.iter().rev()
    }
}
