//! Key lookup and local get/put against the resolved node's store.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::Ring;
use crate::common::{Id, NodeIndex};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// How a key is resolved to the node storing it.
pub enum Lookup {
    /// [Ring::find_key_node]: one `closest_preceding_node` step using only
    /// the caller's own fingers.
    ///
    /// Deterministic for a given caller and ring state, but not necessarily
    /// the key's owner, even on a converged ring.
    SingleHop,
    /// [Ring::find_key_owner]: a full `find_successor` lookup, resolving to the
    /// owner of the key once the ring has converged.
    Recursive,
}

impl Ring {
    /// Resolve `key` with a single routing step from `from`.
    pub fn find_key_node(&self, from: NodeIndex, key: &[u8]) -> Result<NodeIndex> {
        self.closest_preceding_node(from, Id::for_key(key))
    }

    /// Resolve `key` to its owner with a full lookup from `from`.
    pub fn find_key_owner(&self, from: NodeIndex, key: &[u8]) -> Result<NodeIndex> {
        self.find_successor(from, Id::for_key(key))
    }

    /// Resolve `key` from `from` with the given strategy.
    pub fn resolve(&self, from: NodeIndex, key: &[u8], lookup: Lookup) -> Result<NodeIndex> {
        match lookup {
            Lookup::SingleHop => self.find_key_node(from, key),
            Lookup::Recursive => self.find_key_owner(from, key),
        }
    }

    /// Read `key` from the store of the node it resolves to.
    ///
    /// Fails with [Error::MissingKey] if that node does not store `key`.
    pub fn get(&self, from: NodeIndex, key: impl AsRef<[u8]>, lookup: Lookup) -> Result<Bytes> {
        let key = key.as_ref();
        let holder = self.resolve(from, key, lookup)?;

        trace!(?from, ?holder, ?lookup, "Get");

        self.node(holder)?
            .get_local(key)
            .cloned()
            .ok_or_else(|| Error::MissingKey(key.into()))
    }

    /// Write `value` at `key` in the store of the node it resolves to,
    /// overwriting any previous value.
    ///
    /// Returns the node that stored the value.
    pub fn put(
        &mut self,
        from: NodeIndex,
        key: impl AsRef<[u8]>,
        value: impl Into<Bytes>,
        lookup: Lookup,
    ) -> Result<NodeIndex> {
        let key = key.as_ref();
        let holder = self.resolve(from, key, lookup)?;

        trace!(?from, ?holder, ?lookup, "Put");

        self.node_mut(holder)?.put_local(key, value.into());

        Ok(holder)
    }
}
