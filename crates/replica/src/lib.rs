//! Replica side of a live meet: keeps a local copy of the authority's
//! snapshot and forwards actions to it.

pub mod channel;
pub mod connection;
pub mod error;
pub mod websocket;

pub use channel::{Channel, Connector};
pub use connection::{
    ConnectionEvent, ConnectionManager, ConnectionState, ReplicaConfig, ReplicaHandle,
};
pub use error::{ReplicaError, Result};
pub use websocket::{WebSocketChannel, WebSocketConnector};
