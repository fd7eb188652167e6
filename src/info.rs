use serde::{Deserialize, Serialize};

use crate::common::{Id, Node, NodeIndex};
use crate::{Result, Ring};

/// Snapshot of a single node's ring pointers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    index: NodeIndex,
    id: Id,
    address: String,
    successor: Id,
    predecessor: Option<Id>,
    fingers: Vec<Id>,
    stored: usize,
}

impl NodeInfo {
    /// Position of this node in the ring's node table.
    pub fn index(&self) -> NodeIndex {
        self.index
    }
    /// This node's [Id]
    pub fn id(&self) -> Id {
        self.id
    }
    pub fn address(&self) -> &str {
        &self.address
    }
    /// [Id] of the current successor.
    pub fn successor(&self) -> Id {
        self.successor
    }
    /// [Id] of the current predecessor, if one was accepted yet.
    pub fn predecessor(&self) -> Option<Id> {
        self.predecessor
    }
    /// [Id]s of the finger table entries, smallest stride first.
    pub fn fingers(&self) -> &[Id] {
        &self.fingers
    }
    /// Number of values in this node's local store.
    pub fn stored(&self) -> usize {
        self.stored
    }

    fn new(ring: &Ring, index: NodeIndex, node: &Node) -> Result<Self> {
        let id_of = |n: NodeIndex| ring.node(n).map(|n| n.id());

        Ok(Self {
            index,
            id: node.id(),
            address: node.address().to_string(),
            successor: id_of(node.successor())?,
            predecessor: node.predecessor().map(id_of).transpose()?,
            fingers: node
                .fingers()
                .entries()
                .iter()
                .map(|f| id_of(*f))
                .collect::<Result<_>>()?,
            stored: node.stored(),
        })
    }
}

/// Information about a whole ring, useful to verify convergence externally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingInfo {
    nodes: Vec<NodeInfo>,
    ticks: u64,
    consistent: bool,
}

impl RingInfo {
    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }
    /// Maintenance ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
    /// See [Ring::is_consistent].
    pub fn consistent(&self) -> bool {
        self.consistent
    }
    /// Find a node's snapshot by its address.
    pub fn node(&self, address: &str) -> Option<&NodeInfo> {
        self.nodes.iter().find(|n| n.address == address)
    }
}

impl TryFrom<&Ring> for RingInfo {
    type Error = crate::Error;

    fn try_from(ring: &Ring) -> Result<Self> {
        Ok(Self {
            nodes: ring
                .nodes()
                .map(|(index, node)| NodeInfo::new(ring, index, node))
                .collect::<Result<_>>()?,
            ticks: ring.ticks(),
            consistent: ring.is_consistent(),
        })
    }
}

impl Ring {
    /// Returns a serializable snapshot of every node's pointers.
    ///
    /// Fails with [crate::Error::UnknownNode] if any pointer does not index a node.
    pub fn info(&self) -> Result<RingInfo> {
        RingInfo::try_from(self)
    }
}

#[cfg(test)]
mod test {
    use crate::common::Id;
    use crate::Ring;

    #[test]
    fn snapshot_two_nodes() {
        let mut ring = Ring::default();
        let a = ring.add_node_with_id("a", Id::new(10).unwrap()).unwrap();
        let b = ring.add_node_with_id("b", Id::new(500).unwrap()).unwrap();
        ring.join(b, a).unwrap();
        ring.converge(10).unwrap();

        let info = ring.info().unwrap();
        assert!(info.consistent());
        assert_eq!(info.nodes().len(), 2);

        let a = info.node("a").unwrap();
        assert_eq!(a.successor(), Id::new(500).unwrap());
        assert_eq!(a.predecessor(), Some(Id::new(500).unwrap()));
        assert_eq!(a.fingers().len(), 12);

        let json = serde_json::to_string(&info).unwrap();
        let decoded: super::RingInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, info);
    }
}
