//! Circular intervals over the identifier space.

use serde::{Deserialize, Serialize};

use super::{Id, RING_SIZE};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Half-open clockwise interval `(start, end]` on the ring.
///
/// When `start == end` the range covers the whole ring, which is what a
/// single self-looped node owns.
pub struct KeyRange {
    start: Id,
    end: Id,
}

impl KeyRange {
    pub fn new(start: Id, end: Id) -> Self {
        KeyRange { start, end }
    }

    // === Getters ===

    pub fn start(&self) -> Id {
        self.start
    }

    pub fn end(&self) -> Id {
        self.end
    }

    // === Public Methods ===

    /// Returns `true` if `x` lies in this range.
    ///
    /// Errors with [crate::Error::OutOfRange] if `x` is not a valid identifier.
    pub fn contains(&self, x: u64) -> Result<bool> {
        Ok(self.contains_id(Id::new(x)?))
    }

    /// Infallible version of [Self::contains] for an already validated [Id].
    pub fn contains_id(&self, x: Id) -> bool {
        if self.start == self.end {
            return true;
        }

        let offset = self.start.distance(&x);

        offset > 0 && offset <= self.start.distance(&self.end)
    }

    /// Number of identifiers in this range.
    pub fn len(&self) -> u64 {
        match self.start.distance(&self.end) {
            0 => RING_SIZE,
            n => n,
        }
    }

    /// Always `false`, a range covers at least one identifier.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;

    fn range(start: u64, end: u64) -> KeyRange {
        KeyRange::new(Id::new(start).unwrap(), Id::new(end).unwrap())
    }

    #[test]
    fn equal_bounds_cover_everything() {
        let range = range(5, 5);

        for x in 0..RING_SIZE {
            assert!(range.contains(x).unwrap(), "{x} should be in (5, 5]");
        }
        assert_eq!(range.len(), RING_SIZE);
    }

    #[test]
    fn ascending() {
        let range = range(10, 500);

        assert!(!range.contains(10).unwrap());
        assert!(range.contains(11).unwrap());
        assert!(range.contains(500).unwrap());
        assert!(!range.contains(501).unwrap());
        assert!(!range.contains(0).unwrap());
        assert_eq!(range.len(), 490);
    }

    #[test]
    fn wrapped() {
        let range = range(4000, 100);

        assert!(range.contains(4050).unwrap());
        assert!(range.contains(50).unwrap());
        assert!(range.contains(0).unwrap());
        assert!(range.contains(100).unwrap());
        assert!(!range.contains(4000).unwrap());
        assert!(!range.contains(2000).unwrap());
        assert_eq!(range.len(), 196);
    }

    #[test]
    fn rejects_out_of_range_probe() {
        assert_eq!(range(1, 2).contains(RING_SIZE), Err(Error::OutOfRange(RING_SIZE)));
    }
}
