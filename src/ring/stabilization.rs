//! Stabilization protocol: `stabilize`, `notify` and `fix_fingers`.

use tracing::{debug, trace};

use super::Ring;
use crate::common::{KeyRange, NodeIndex};
use crate::{Error, Result};

impl Ring {
    /// One unit of periodic maintenance for `node`: [Self::stabilize] then [Self::fix_fingers].
    ///
    /// Returns the number of pointers that changed.
    pub fn cohere(&mut self, node: NodeIndex) -> Result<usize> {
        Ok(self.stabilize(node)? + self.fix_fingers(node)?)
    }

    /// Verify `node`'s successor is still the closest one, and notify it of `node`.
    ///
    /// Returns the number of pointers that changed.
    pub fn stabilize(&mut self, node: NodeIndex) -> Result<usize> {
        let id = self.id_of(node)?;
        let mut successor = self.node(node)?.successor();

        let x = match self.node(successor)?.predecessor() {
            Some(x) => x,
            None => {
                // Bootstraps a ring of two, or a node alone with itself.
                return Ok(self.notify(successor, node)? as usize);
            }
        };

        let mut changed = 0;

        if KeyRange::new(id, self.id_of(successor)?).contains_id(self.id_of(x)?)
            && self.node_mut(node)?.set_successor(x)
        {
            debug!(?node, old = ?successor, new = ?x, "Adopted closer successor");

            successor = x;
            changed += 1;
        }

        if self.notify(successor, node)? {
            changed += 1;
        }

        Ok(changed)
    }

    /// `candidate` thinks it might be `node`'s predecessor.
    ///
    /// Accepted if `node` has no predecessor yet, or if `candidate` lies between
    /// the current predecessor and `node`. Returns `true` if the predecessor changed.
    pub fn notify(&mut self, node: NodeIndex, candidate: NodeIndex) -> Result<bool> {
        let candidate_id = self.id_of(candidate)?;
        let this = self.node(node)?;

        let accept = match this.predecessor() {
            None => true,
            Some(predecessor) => {
                KeyRange::new(self.id_of(predecessor)?, this.id()).contains_id(candidate_id)
            }
        };

        if !accept {
            return Ok(false);
        }

        let changed = self.node_mut(node)?.set_predecessor(candidate);

        if changed {
            trace!(?node, ?candidate, "Accepted new predecessor");
        }

        Ok(changed)
    }

    /// Recompute every finger of `node` from scratch.
    ///
    /// A finger whose lookup exceeds the hop limit keeps its previous entry.
    /// Returns the number of fingers that changed.
    pub fn fix_fingers(&mut self, node: NodeIndex) -> Result<usize> {
        let size = self.node(node)?.fingers().len();
        let mut changed = 0;

        for i in 0..size {
            let target = self.node(node)?.fingers().target(i);

            match self.find_successor(node, target) {
                Ok(finger) => {
                    if self.node_mut(node)?.fingers_mut().set(i, finger) {
                        changed += 1;
                    }
                }
                Err(Error::Routing { hops, .. }) => {
                    debug!(?node, finger = i, ?target, hops, "Keeping stale finger");
                }
                Err(error) => return Err(error),
            }
        }

        Ok(changed)
    }

    /// Check whether `node`'s predecessor is still alive.
    ///
    /// Nodes never fail in-process, so this always reports healthy.
    pub fn check_predecessor(&self, node: NodeIndex) -> Result<bool> {
        self.node(node)?;

        Ok(true)
    }
}
