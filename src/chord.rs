//! Chord ring handle, running the [Ring] in an actor thread.

use std::{thread, time::Duration};

use bytes::Bytes;
use flume::{RecvTimeoutError, Sender};

use crate::{
    actor::{Actor, ActorMessage},
    common::Id,
    Config, Error, Lookup, Result, RingInfo, TickOrder,
};

#[derive(Debug, Clone)]
/// Thread-safe handle to a [Ring](crate::Ring) owned by a background actor.
///
/// Nodes are addressed by their address label. Every request is served to
/// completion before the next one, and maintenance ticks run in between,
/// every [Config::maintenance_interval].
///
/// The actor thread stops once [Chord::shutdown] is called, or every clone
/// of this handle is dropped.
pub struct Chord {
    sender: Sender<ActorMessage>,
    request_timeout: Duration,
}

impl Chord {
    /// Returns a builder to edit settings before creating a Chord ring.
    pub fn builder() -> ChordBuilder {
        ChordBuilder::default()
    }

    /// Create a new ring with the given config.
    pub fn new(config: Config) -> Result<Self> {
        let (sender, receiver) = flume::unbounded();
        let request_timeout = config.request_timeout;

        let actor = Actor::new(config, receiver)?;

        thread::Builder::new()
            .name("chordring".to_string())
            .spawn(move || actor.run())?;

        Ok(Chord {
            sender,
            request_timeout,
        })
    }

    // === Getters ===

    /// Snapshot of every node's ring pointers.
    pub fn info(&self) -> Result<RingInfo> {
        self.request(ActorMessage::Info)?
    }

    // === Public Methods ===

    /// Add a self-looped node labeled `address`, returning its [Id].
    pub fn add_node(&self, address: &str) -> Result<Id> {
        self.request(|sender| ActorMessage::AddNode(address.to_string(), sender))?
    }

    /// Attach the node labeled `address` to the ring of the node labeled `via`.
    pub fn join(&self, address: &str, via: &str) -> Result<()> {
        self.request(|sender| ActorMessage::Join {
            address: address.to_string(),
            via: via.to_string(),
            sender,
        })?
    }

    /// Address of the node succeeding `target`, looked up from the node labeled `from`.
    pub fn find_successor(&self, from: &str, target: Id) -> Result<String> {
        self.request(|sender| ActorMessage::FindSuccessor {
            from: from.to_string(),
            target,
            sender,
        })?
    }

    /// Read `key`, resolved from the node labeled `from`.
    pub fn get(&self, from: &str, key: impl AsRef<[u8]>, lookup: Lookup) -> Result<Bytes> {
        self.request(|sender| ActorMessage::Get {
            from: from.to_string(),
            key: key.as_ref().into(),
            lookup,
            sender,
        })?
    }

    /// Write `value` at `key`, resolved from the node labeled `from`.
    ///
    /// Returns the address of the node that stored the value.
    pub fn put(
        &self,
        from: &str,
        key: impl AsRef<[u8]>,
        value: impl Into<Bytes>,
        lookup: Lookup,
    ) -> Result<String> {
        self.request(|sender| ActorMessage::Put {
            from: from.to_string(),
            key: key.as_ref().into(),
            value: value.into(),
            lookup,
            sender,
        })?
    }

    /// Run maintenance ticks right away until the ring converges.
    ///
    /// See [Ring::converge](crate::Ring::converge).
    pub fn converge(&self, max_rounds: usize) -> Result<usize> {
        self.request(|sender| ActorMessage::Converge(max_rounds, sender))?
    }

    /// Shutdown the actor thread loop.
    pub fn shutdown(&self) -> Result<()> {
        self.request(ActorMessage::Shutdown)
    }

    // === Private Methods ===

    fn request<T>(&self, message: impl FnOnce(Sender<T>) -> ActorMessage) -> Result<T> {
        let (sender, receiver) = flume::bounded::<T>(1);

        self.sender
            .send(message(sender))
            .map_err(|_| Error::Shutdown)?;

        receiver
            .recv_timeout(self.request_timeout)
            .map_err(|error| match error {
                RecvTimeoutError::Timeout => Error::Timeout,
                RecvTimeoutError::Disconnected => Error::Shutdown,
            })
    }

    #[cfg(feature = "async")]
    pub(crate) fn sender(&self) -> &Sender<ActorMessage> {
        &self.sender
    }
}

#[derive(Debug, Default, Clone)]
/// Chord ring builder
pub struct ChordBuilder(Config);

impl ChordBuilder {
    /// Set the number of finger table entries per node.
    pub fn finger_table_size(&mut self, size: usize) -> &mut Self {
        self.0.finger_table_size = size;

        self
    }

    /// Set the maximum hops of a single lookup.
    pub fn max_hops(&mut self, max_hops: usize) -> &mut Self {
        self.0.max_hops = max_hops;

        self
    }

    /// Set the order nodes are visited in during a maintenance tick.
    pub fn tick_order(&mut self, tick_order: TickOrder) -> &mut Self {
        self.0.tick_order = tick_order;

        self
    }

    /// Set how often the actor runs a maintenance tick.
    pub fn maintenance_interval(&mut self, interval: Duration) -> &mut Self {
        self.0.maintenance_interval = interval;

        self
    }

    /// Set how long to wait for the actor to reply to a request.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.0.request_timeout = timeout;

        self
    }

    /// Create a Chord ring with the current configuration.
    pub fn build(&self) -> Result<Chord> {
        Chord::new(self.0.clone())
    }
}
