use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::ID_BITS;
use crate::{Error, Result};

/// Default bound on the number of hops a single lookup may take.
pub const DEFAULT_MAX_HOPS: usize = 128;
/// Default delay between two maintenance ticks of the [crate::Chord] actor.
pub const DEFAULT_MAINTENANCE_INTERVAL: Duration = Duration::from_millis(50);
/// Default time to wait for the [crate::Chord] actor to reply.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Order in which [crate::Ring::tick] visits nodes.
///
/// Order does not affect eventual correctness, only how many ticks it takes.
pub enum TickOrder {
    /// Most recently added node first.
    #[default]
    ReverseJoin,
    /// Oldest node first.
    InsertionOrder,
    /// A fresh random permutation every tick.
    Shuffled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Ring Configurations
pub struct Config {
    /// Number of finger table entries per node, at most [ID_BITS].
    ///
    /// Defaults to [ID_BITS]
    pub finger_table_size: usize,
    /// Maximum hops of a single `find_successor` before it fails
    /// with [Error::Routing].
    ///
    /// Defaults to [DEFAULT_MAX_HOPS]
    pub max_hops: usize,
    /// Node visiting order of a maintenance tick.
    ///
    /// Defaults to [TickOrder::ReverseJoin]
    pub tick_order: TickOrder,
    /// How often the [crate::Chord] actor runs a maintenance tick.
    ///
    /// Defaults to [DEFAULT_MAINTENANCE_INTERVAL]
    pub maintenance_interval: Duration,
    /// How long a [crate::Chord] handle waits for the actor to reply.
    ///
    /// A request that times out is still carried out by the actor, only its
    /// reply is lost.
    ///
    /// Defaults to [DEFAULT_REQUEST_TIMEOUT]
    pub request_timeout: Duration,
}

impl Config {
    /// Check that this config describes a usable ring.
    pub fn validate(&self) -> Result<()> {
        if self.finger_table_size == 0 {
            return Err(Error::InvalidConfig("finger_table_size must be at least 1"));
        }
        if self.finger_table_size > ID_BITS as usize {
            return Err(Error::InvalidConfig(
                "finger_table_size can not exceed the identifier bits",
            ));
        }
        if self.max_hops == 0 {
            return Err(Error::InvalidConfig("max_hops must be at least 1"));
        }
        if self.maintenance_interval.is_zero() {
            return Err(Error::InvalidConfig("maintenance_interval can not be zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidConfig("request_timeout can not be zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            finger_table_size: ID_BITS as usize,
            max_hops: DEFAULT_MAX_HOPS,
            tick_order: TickOrder::default(),
            maintenance_interval: DEFAULT_MAINTENANCE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
