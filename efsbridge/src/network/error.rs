use std::net::SocketAddr;

use thiserror::Error;

/// UDP transport failure.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to send datagram to {addr}: {source}")]
    Send {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to receive datagram: {0}")]
    Receive(#[from] std::io::Error),

    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}
