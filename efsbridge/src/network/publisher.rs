//! Outbound event publishing over UDP.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use tracing::trace;

use crate::protocol::OutboundEvent;

use super::TransportError;

/// Publishes outbound events as newline-terminated JSON datagrams.
///
/// Stateless by design: each send binds a fresh ephemeral socket, sends one
/// datagram, and drops the socket. UDP is connectionless and the peer may
/// come and go; holding a socket open buys nothing and a send failure never
/// poisons later sends.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    destination: SocketAddr,
}

impl EventPublisher {
    pub fn new(destination: SocketAddr) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    /// Serialize and send one event.
    pub fn publish(&self, event: &OutboundEvent) -> Result<(), TransportError> {
        let mut payload = serde_json::to_vec(event)?;
        payload.push(b'\n');
        self.send_raw(&payload)?;
        trace!(
            event = event.type_name(),
            bytes = payload.len(),
            dest = %self.destination,
            "event published"
        );
        Ok(())
    }

    fn send_raw(&self, payload: &[u8]) -> Result<(), TransportError> {
        let bind_addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let socket = UdpSocket::bind(bind_addr).map_err(|source| TransportError::Bind {
            addr: bind_addr,
            source,
        })?;
        socket
            .send_to(payload, self.destination)
            .map_err(|source| TransportError::Send {
                addr: self.destination,
                source,
            })?;
        Ok(())
    }
}
