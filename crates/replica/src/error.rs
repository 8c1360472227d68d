use meet::protocol::RpcError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplicaError>;

#[derive(Error, Debug)]
pub enum ReplicaError {
    #[error("Not connected to the authority")]
    NotConnected,

    #[error("Channel closed before the authority answered")]
    ChannelClosed,

    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    #[error("Authority rejected the request ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Meet error: {0}")]
    Meet(#[from] meet::MeetError),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The connection manager task has stopped.
    #[error("Replica has shut down")]
    Stopped,
}

impl From<RpcError> for ReplicaError {
    fn from(error: RpcError) -> Self {
        Self::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}
