//! In-process Chord ring
//!
//! Nodes live in a single table and reference each other by [NodeIndex].
//! Inter-node calls (`find_successor`, `notify`, reading a predecessor) are
//! plain synchronous method calls on this table.

mod maintenance;
mod routing;
mod stabilization;
mod storage;

use std::collections::HashMap;

use tracing::debug;

use crate::common::{Id, Node, NodeIndex};
use crate::{Config, Error, Result};

pub use maintenance::TickReport;
pub use routing::Route;
pub use storage::Lookup;

#[derive(Debug, Clone)]
/// A set of Chord nodes and their ring pointers.
pub struct Ring {
    config: Config,
    nodes: Vec<Node>,
    addresses: HashMap<String, NodeIndex>,
    ids: HashMap<Id, NodeIndex>,
    ticks: u64,
}

impl Ring {
    /// Create an empty ring, failing if `config` is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        Ok(Ring::empty(config))
    }

    // === Getters ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of nodes in this ring.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of maintenance ticks applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn node(&self, index: NodeIndex) -> Result<&Node> {
        self.nodes.get(index.0).ok_or(Error::UnknownNode(index))
    }

    /// Returns the index of the node labeled `address`.
    pub fn index_of(&self, address: &str) -> Result<NodeIndex> {
        self.addresses
            .get(address)
            .copied()
            .ok_or_else(|| Error::UnknownAddress(address.to_string()))
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    // === Public Methods ===

    /// Add a self-looped node whose id is derived from its `address`.
    pub fn add_node(&mut self, address: &str) -> Result<NodeIndex> {
        self.add_node_with_id(address, Id::from_address(address))
    }

    /// Add a self-looped node with an externally assigned id.
    ///
    /// Rejects duplicate addresses and duplicate ids.
    pub fn add_node_with_id(&mut self, address: &str, id: Id) -> Result<NodeIndex> {
        if self.addresses.contains_key(address) {
            return Err(Error::DuplicateAddress(address.to_string()));
        }
        if let Some(existing) = self.ids.get(&id) {
            return Err(Error::IdCollision {
                id,
                existing: self.node(*existing)?.address().to_string(),
            });
        }

        let index = NodeIndex(self.nodes.len());

        self.nodes.push(Node::new(
            index,
            id,
            address,
            self.config.finger_table_size,
        ));
        self.addresses.insert(address.to_string(), index);
        self.ids.insert(id, index);

        debug!(?index, ?id, address, "Added node");

        Ok(index)
    }

    /// Attach `node` to the ring `existing` belongs to.
    ///
    /// Only the successor is set here, the predecessor and fingers are
    /// repaired by later maintenance ticks.
    pub fn join(&mut self, node: NodeIndex, existing: NodeIndex) -> Result<()> {
        let id = self.node(node)?.id();
        let successor = self.find_successor(existing, id)?;

        self.node_mut(node)?.set_successor(successor);

        debug!(?node, ?existing, ?successor, "Joined ring");

        Ok(())
    }

    // === Private Methods ===

    fn empty(config: Config) -> Self {
        Ring {
            config,
            nodes: Vec::new(),
            addresses: HashMap::new(),
            ids: HashMap::new(),
            ticks: 0,
        }
    }

    fn node_mut(&mut self, index: NodeIndex) -> Result<&mut Node> {
        self.nodes.get_mut(index.0).ok_or(Error::UnknownNode(index))
    }

    fn id_of(&self, index: NodeIndex) -> Result<Id> {
        Ok(self.node(index)?.id())
    }
}

impl Default for Ring {
    fn default() -> Self {
        Ring::empty(Config::default())
    }
}
