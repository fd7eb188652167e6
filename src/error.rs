//! Main Crate Error

use crate::common::{Id, NodeIndex};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Chordring crate error enum.
pub enum Error {
    /// An identifier or membership probe outside of `[0, RING_SIZE)`.
    #[error("Identifier {0} is outside of the ring [0, {max})", max = crate::common::RING_SIZE)]
    OutOfRange(u64),

    /// `get` on a key that the resolved node does not store.
    #[error("Key not found: {0:?}")]
    MissingKey(Box<[u8]>),

    /// Lookup did not settle within [crate::Config::max_hops] hops.
    #[error("Lookup for {target:?} exceeded {hops} hops")]
    Routing {
        /// The identifier being looked up.
        target: Id,
        /// Hops taken before giving up.
        hops: usize,
    },

    /// A [NodeIndex] that does not belong to this ring.
    #[error("Unknown node index: {0:?}")]
    UnknownNode(NodeIndex),

    /// An address that does not belong to this ring.
    #[error("Unknown node address: {0}")]
    UnknownAddress(String),

    /// Addresses are unique labels.
    #[error("A node with address {0} already exists")]
    DuplicateAddress(String),

    /// Two addresses hashed (or were assigned) to the same identifier.
    #[error("Identifier collision: {id:?} is already taken by {existing}")]
    IdCollision {
        /// The colliding identifier.
        id: Id,
        /// Address of the node already holding `id`.
        existing: String,
    },

    /// Rejected by [crate::Config::validate].
    #[error("Invalid config: {0}")]
    InvalidConfig(&'static str),

    /// [crate::Ring::converge] ran out of rounds.
    #[error("Ring did not converge after {rounds} rounds")]
    NotConverged {
        /// Rounds of maintenance applied.
        rounds: usize,
    },

    /// Failed to spawn the actor thread.
    #[error("I/O error: {message}")]
    IO {
        /// Kind of the underlying [std::io::Error].
        kind: std::io::ErrorKind,
        /// Display of the underlying [std::io::Error].
        message: String,
    },

    /// The actor thread is gone.
    #[error("Chord actor was shutdown")]
    Shutdown,

    /// The actor did not reply within [crate::Config::request_timeout].
    #[error("Request to the Chord actor timed out")]
    Timeout,
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Alias for `Result<T, chordring::Error>`.
pub type Result<T, E = Error> = core::result::Result<T, E>;
