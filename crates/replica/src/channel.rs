//! The duplex text channel a replica talks to the authority over.
//!
//! The connection manager only sees these traits, so its state machine can
//! be driven by an in-memory pair in tests.

use async_trait::async_trait;

use crate::Result;

#[async_trait]
pub trait Channel: Send {
    async fn send(&mut self, text: String) -> Result<()>;

    /// Next text frame. `None` once the peer has closed the channel.
    async fn recv(&mut self) -> Result<Option<String>>;
}

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Channel: Channel + 'static;

    async fn connect(&self) -> Result<Self::Channel>;

    /// Where this connector dials, for logs.
    fn describe(&self) -> String;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::{Arc, Mutex};

    use tokio::sync::mpsc;

    use super::*;
    use crate::ReplicaError;

    /// Replica side of an in-memory channel.
    pub struct MemoryChannel {
        incoming: mpsc::UnboundedReceiver<String>,
        outgoing: mpsc::UnboundedSender<String>,
    }

    /// Authority side of an in-memory channel. Dropping it closes the channel.
    pub struct MemoryPeer {
        pub to_replica: mpsc::UnboundedSender<String>,
        pub from_replica: mpsc::UnboundedReceiver<String>,
    }

    pub fn pair() -> (MemoryChannel, MemoryPeer) {
        let (to_replica, incoming) = mpsc::unbounded_channel();
        let (outgoing, from_replica) = mpsc::unbounded_channel();
        (
            MemoryChannel { incoming, outgoing },
            MemoryPeer {
                to_replica,
                from_replica,
            },
        )
    }

    #[async_trait]
    impl Channel for MemoryChannel {
        async fn send(&mut self, text: String) -> Result<()> {
            self.outgoing
                .send(text)
                .map_err(|_| ReplicaError::ChannelClosed)
        }

        async fn recv(&mut self) -> Result<Option<String>> {
            Ok(self.incoming.recv().await)
        }
    }

    /// Hands out queued channels; refuses to connect while the queue is empty.
    #[derive(Clone)]
    pub struct MemoryConnector {
        queue: Arc<Mutex<mpsc::UnboundedReceiver<MemoryChannel>>>,
    }

    impl MemoryConnector {
        pub fn new() -> (Self, mpsc::UnboundedSender<MemoryChannel>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    queue: Arc::new(Mutex::new(rx)),
                },
                tx,
            )
        }
    }

    #[async_trait]
    impl Connector for MemoryConnector {
        type Channel = MemoryChannel;

        async fn connect(&self) -> Result<MemoryChannel> {
            let mut queue = self
                .queue
                .lock()
                .map_err(|_| ReplicaError::ConnectFailed("poisoned".to_string()))?;
            queue
                .try_recv()
                .map_err(|_| ReplicaError::ConnectFailed("connection refused".to_string()))
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }
}
