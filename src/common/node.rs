//! Struct and implementation of a node on the Chord ring
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::common::{FingerTable, Id};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Position of a node in the [crate::Ring]'s node table.
///
/// Ring pointers are indices, so a node referencing itself is just its own index.
pub struct NodeIndex(pub usize);

impl Debug for NodeIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
/// Node on the Chord ring: its identity, ring pointers, fingers and local store.
pub struct Node {
    id: Id,
    address: String,
    successor: NodeIndex,
    predecessor: Option<NodeIndex>,
    fingers: FingerTable,
    store: HashMap<Box<[u8]>, Bytes>,
}

impl Node {
    /// Creates a self-looped node occupying `index` of its ring.
    pub fn new(index: NodeIndex, id: Id, address: impl Into<String>, fingers: usize) -> Node {
        Node {
            id,
            address: address.into(),
            successor: index,
            predecessor: None,
            fingers: FingerTable::new(id, index, fingers),
            store: HashMap::new(),
        }
    }

    // === Getters ===

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn successor(&self) -> NodeIndex {
        self.successor
    }

    pub fn predecessor(&self) -> Option<NodeIndex> {
        self.predecessor
    }

    pub fn fingers(&self) -> &FingerTable {
        &self.fingers
    }

    /// Number of values stored locally.
    pub fn stored(&self) -> usize {
        self.store.len()
    }

    pub fn get_local(&self, key: &[u8]) -> Option<&Bytes> {
        self.store.get(key)
    }

    // === Crate Methods ===

    /// Returns `true` if the successor changed.
    pub(crate) fn set_successor(&mut self, successor: NodeIndex) -> bool {
        std::mem::replace(&mut self.successor, successor) != successor
    }

    /// Returns `true` if the predecessor changed.
    pub(crate) fn set_predecessor(&mut self, predecessor: NodeIndex) -> bool {
        self.predecessor.replace(predecessor) != Some(predecessor)
    }

    pub(crate) fn fingers_mut(&mut self) -> &mut FingerTable {
        &mut self.fingers
    }

    pub(crate) fn put_local(&mut self, key: &[u8], value: Bytes) -> Option<Bytes> {
        self.store.insert(key.into(), value)
    }
}
