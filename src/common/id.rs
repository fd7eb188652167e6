//! Chord node Id or a lookup target
use serde::{Deserialize, Serialize};
use sha1_smol::Sha1;
use std::fmt::{self, Debug, Display, Formatter};

use crate::{Error, Result};

/// The size of the identifier space in bits.
pub const ID_BITS: u32 = 12;
/// Number of identifiers on the ring, `M = 2^ID_BITS`.
pub const RING_SIZE: u64 = 1 << ID_BITS;

#[derive(Clone, Copy, PartialEq, Ord, PartialOrd, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
/// Position on the ring, always within `[0, RING_SIZE)`.
pub struct Id(u64);

impl Id {
    /// Create a new Id. Returns Err if `value` is not within `[0, RING_SIZE)`.
    pub fn new(value: u64) -> Result<Id> {
        if value >= RING_SIZE {
            return Err(Error::OutOfRange(value));
        }

        Ok(Id(value))
    }

    /// Derive the Id of a node from its address.
    pub fn from_address(address: &str) -> Id {
        Id::hash(address.as_bytes())
    }

    /// Derive the Id of a stored key.
    pub fn for_key(key: &[u8]) -> Id {
        Id::hash(key)
    }

    /// Reduce a SHA-1 digest of `bytes` onto the ring.
    ///
    /// Only range-validity is guaranteed, distinct inputs may collide.
    pub fn hash(bytes: &[u8]) -> Id {
        let digest = Sha1::from(bytes).digest().bytes();

        let mut prefix = [0; 8];
        prefix.copy_from_slice(&digest[..8]);

        Id(u64::from_be_bytes(prefix) % RING_SIZE)
    }

    /// The raw value of this Id.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Target of the `i`th finger: `(self + 2^i) mod RING_SIZE`.
    ///
    /// `i` must be less than [ID_BITS].
    pub fn finger_target(&self, i: usize) -> Id {
        debug_assert!((i as u32) < ID_BITS);

        Id((self.0 + (1 << i)) % RING_SIZE)
    }

    /// Clockwise distance from this Id to `other`.
    ///
    /// Distance to self is 0
    /// Distance to the Id right before self is `RING_SIZE - 1`
    pub fn distance(&self, other: &Id) -> u64 {
        (other.0 + RING_SIZE - self.0) % RING_SIZE
    }
}

impl TryFrom<u64> for Id {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self> {
        Id::new(value)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}
