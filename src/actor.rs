//! Actor owning a [Ring], run on its own thread by [crate::Chord].
//!
//! Every message is handled to completion before the next one is received,
//! and maintenance ticks run between messages, so each node's pointers and
//! store are only ever touched by one operation at a time.

use std::time::Instant;

use bytes::Bytes;
use flume::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info};

use crate::common::{Id, NodeIndex};
use crate::{Config, Lookup, Result, Ring, RingInfo};

#[derive(Debug)]
pub(crate) struct Actor {
    ring: Ring,
    receiver: Receiver<ActorMessage>,
    last_tick: Instant,
}

impl Actor {
    pub fn new(config: Config, receiver: Receiver<ActorMessage>) -> Result<Self> {
        let ring = Ring::new(config)?;

        Ok(Self {
            ring,
            receiver,
            last_tick: Instant::now(),
        })
    }

    /// Serve messages and run maintenance until shutdown, or until every
    /// handle was dropped.
    pub fn run(mut self) {
        info!("Chord actor started");

        let mut shutdown = None;

        loop {
            let interval = self.ring.config().maintenance_interval;
            let timeout = interval.saturating_sub(self.last_tick.elapsed());

            match self.receiver.recv_timeout(timeout) {
                Ok(message) => {
                    if let Some(ack) = self.handle(message) {
                        shutdown = Some(ack);
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("chordring::Chord's actor thread was shutdown after Drop.");
                    break;
                }
            }

            if self.last_tick.elapsed() >= interval {
                self.tick();
            }
        }

        info!(ticks = self.ring.ticks(), nodes = self.ring.len(), "Chord actor stopped");

        // Disconnect every handle before acknowledging, so requests sent after
        // `shutdown` returns fail right away.
        drop(self.receiver);

        if let Some(ack) = shutdown {
            let _ = ack.send(());
        }
    }

    fn tick(&mut self) {
        match self.ring.tick() {
            Ok(report) if report.changes > 0 => {
                debug!(?report, "Maintenance tick");
            }
            Ok(_) => {}
            Err(error) => {
                debug!(?error, "Maintenance tick failed");
            }
        }

        self.last_tick = Instant::now();
    }

    /// Returns the acknowledgement sender once asked to shutdown.
    fn handle(&mut self, message: ActorMessage) -> Option<Sender<()>> {
        match message {
            ActorMessage::AddNode(address, sender) => {
                let result = self
                    .ring
                    .add_node(&address)
                    .and_then(|index| Ok(self.ring.node(index)?.id()));

                let _ = sender.send(result);
            }
            ActorMessage::Join {
                address,
                via,
                sender,
            } => {
                let result = self.index_pair(&address, &via).and_then(|(node, existing)| {
                    self.ring.join(node, existing)
                });

                let _ = sender.send(result);
            }
            ActorMessage::FindSuccessor {
                from,
                target,
                sender,
            } => {
                let result = self
                    .ring
                    .index_of(&from)
                    .and_then(|from| self.ring.find_successor(from, target))
                    .and_then(|node| self.address_of(node));

                let _ = sender.send(result);
            }
            ActorMessage::Get {
                from,
                key,
                lookup,
                sender,
            } => {
                let result = self
                    .ring
                    .index_of(&from)
                    .and_then(|from| self.ring.get(from, &key, lookup));

                let _ = sender.send(result);
            }
            ActorMessage::Put {
                from,
                key,
                value,
                lookup,
                sender,
            } => {
                let result = self
                    .ring
                    .index_of(&from)
                    .and_then(|from| self.ring.put(from, &key, value, lookup))
                    .and_then(|holder| self.address_of(holder));

                let _ = sender.send(result);
            }
            ActorMessage::Converge(max_rounds, sender) => {
                let result = self.ring.converge(max_rounds);
                self.last_tick = Instant::now();

                let _ = sender.send(result);
            }
            ActorMessage::Info(sender) => {
                let _ = sender.send(self.ring.info());
            }
            ActorMessage::Shutdown(sender) => return Some(sender),
        }

        None
    }

    fn index_pair(&self, a: &str, b: &str) -> Result<(NodeIndex, NodeIndex)> {
        Ok((self.ring.index_of(a)?, self.ring.index_of(b)?))
    }

    fn address_of(&self, node: NodeIndex) -> Result<String> {
        Ok(self.ring.node(node)?.address().to_string())
    }
}

#[derive(Debug)]
pub(crate) enum ActorMessage {
    AddNode(String, Sender<Result<Id>>),
    Join {
        address: String,
        via: String,
        sender: Sender<Result<()>>,
    },
    FindSuccessor {
        from: String,
        target: Id,
        sender: Sender<Result<String>>,
    },
    Get {
        from: String,
        key: Box<[u8]>,
        lookup: Lookup,
        sender: Sender<Result<Bytes>>,
    },
    Put {
        from: String,
        key: Box<[u8]>,
        value: Bytes,
        lookup: Lookup,
        sender: Sender<Result<String>>,
    },
    Converge(usize, Sender<Result<usize>>),
    Info(Sender<Result<RingInfo>>),
    Shutdown(Sender<()>),
}
