//! Successor lookup over finger tables.

use tracing::{debug, trace};

use super::Ring;
use crate::common::{Id, KeyRange, NodeIndex};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of a successor lookup.
pub struct Route {
    /// Node believed to succeed the target.
    pub node: NodeIndex,
    /// Delegations it took to get there.
    pub hops: usize,
}

impl Ring {
    /// Find the node succeeding `target`, starting at `from`.
    ///
    /// On a ring that has not converged yet, the answer may not be the true
    /// owner of `target`.
    pub fn find_successor(&self, from: NodeIndex, target: Id) -> Result<NodeIndex> {
        Ok(self.route(from, target)?.node)
    }

    /// Same as [Self::find_successor] but also reports the hop count.
    ///
    /// Fails with [Error::Routing] after [crate::Config::max_hops] delegations.
    pub fn route(&self, from: NodeIndex, target: Id) -> Result<Route> {
        let mut current = from;
        let mut hops = 0;

        loop {
            let node = self.node(current)?;

            // A node succeeds its own id.
            if node.id() == target {
                return Ok(Route {
                    node: current,
                    hops,
                });
            }

            let successor = node.successor();

            if KeyRange::new(node.id(), self.id_of(successor)?).contains_id(target) {
                return Ok(Route {
                    node: successor,
                    hops,
                });
            }

            let next = self.closest_preceding_node(current, target)?;

            // Nothing closer is known, which happens before the ring converges.
            if next == current {
                return Ok(Route {
                    node: current,
                    hops,
                });
            }

            hops += 1;

            if hops > self.config.max_hops {
                debug!(?target, ?from, hops, "Lookup exceeded max hops");

                return Err(Error::Routing { target, hops });
            }

            trace!(?target, from = ?current, to = ?next, "Lookup hop");

            current = next;
        }
    }

    /// Return the finger of `from` closest before `target`, or `from` itself.
    ///
    /// Fingers are scanned from the largest stride to the smallest.
    pub fn closest_preceding_node(&self, from: NodeIndex, target: Id) -> Result<NodeIndex> {
        let node = self.node(from)?;
        let range = KeyRange::new(node.id(), target);

        for finger in node.fingers().iter_descending() {
            if range.contains_id(self.id_of(*finger)?) {
                return Ok(*finger);
            }
        }

        Ok(from)
    }
}
