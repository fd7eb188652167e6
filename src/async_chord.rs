//! AsyncChord handle.

use bytes::Bytes;

use crate::{
    actor::ActorMessage, common::Id, Chord, Error, Lookup, Result, RingInfo,
};

impl Chord {
    /// Return an async version of the Chord handle.
    pub fn as_async(self) -> AsyncChord {
        AsyncChord(self)
    }
}

#[derive(Debug, Clone)]
/// Async version of the [Chord] handle.
///
/// Replies are awaited without a timeout, wrap calls in your runtime's
/// timeout if you need one.
pub struct AsyncChord(Chord);

impl AsyncChord {
    // === Getters ===

    /// Snapshot of every node's ring pointers.
    pub async fn info(&self) -> Result<RingInfo> {
        self.request(ActorMessage::Info).await?
    }

    // === Public Methods ===

    /// See [Chord::add_node].
    pub async fn add_node(&self, address: &str) -> Result<Id> {
        self.request(|sender| ActorMessage::AddNode(address.to_string(), sender))
            .await?
    }

    /// See [Chord::join].
    pub async fn join(&self, address: &str, via: &str) -> Result<()> {
        self.request(|sender| ActorMessage::Join {
            address: address.to_string(),
            via: via.to_string(),
            sender,
        })
        .await?
    }

    /// See [Chord::find_successor].
    pub async fn find_successor(&self, from: &str, target: Id) -> Result<String> {
        self.request(|sender| ActorMessage::FindSuccessor {
            from: from.to_string(),
            target,
            sender,
        })
        .await?
    }

    /// See [Chord::get].
    pub async fn get(&self, from: &str, key: impl AsRef<[u8]>, lookup: Lookup) -> Result<Bytes> {
        let key: Box<[u8]> = key.as_ref().into();

        self.request(|sender| ActorMessage::Get {
            from: from.to_string(),
            key,
            lookup,
            sender,
        })
        .await?
    }

    /// See [Chord::put].
    pub async fn put(
        &self,
        from: &str,
        key: impl AsRef<[u8]>,
        value: impl Into<Bytes>,
        lookup: Lookup,
    ) -> Result<String> {
        let key: Box<[u8]> = key.as_ref().into();
        let value = value.into();

        self.request(|sender| ActorMessage::Put {
            from: from.to_string(),
            key,
            value,
            lookup,
            sender,
        })
        .await?
    }

    /// See [Chord::converge].
    pub async fn converge(&self, max_rounds: usize) -> Result<usize> {
        self.request(|sender| ActorMessage::Converge(max_rounds, sender))
            .await?
    }

    /// Shutdown the actor thread loop.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(ActorMessage::Shutdown).await
    }

    // === Private Methods ===

    async fn request<T>(&self, message: impl FnOnce(flume::Sender<T>) -> ActorMessage) -> Result<T> {
        let (sender, receiver) = flume::bounded::<T>(1);

        self.0
            .sender()
            .send(message(sender))
            .map_err(|_| Error::Shutdown)?;

        receiver.recv_async().await.map_err(|_| Error::Shutdown)
    }
}
