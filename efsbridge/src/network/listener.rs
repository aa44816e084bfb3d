//! Inbound command polling over UDP.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use tracing::trace;

use super::TransportError;

/// Largest inbound datagram the listener will accept.
const MAX_DATAGRAM: usize = 1024;

/// Non-blocking UDP listener for inbound command datagrams.
///
/// Bound while the bridge is enabled and dropped on disable, so commands can
/// never arrive outside a live session. Polled from the host's timer tick;
/// an empty queue is the common case and is not an error.
#[derive(Debug)]
pub struct CommandListener {
    socket: UdpSocket,
}

impl CommandListener {
    /// Bind the inbound socket in non-blocking mode.
    pub fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr).map_err(|source| TransportError::Bind { addr, source })?;
        socket
            .set_nonblocking(true)
            .map_err(TransportError::Receive)?;
        Ok(Self { socket })
    }

    /// The address the listener actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.local_addr().map_err(TransportError::Receive)
    }

    /// Receive at most one pending datagram.
    ///
    /// Returns `Ok(None)` when the queue is empty. `ConnectionReset` is
    /// treated the same way: on some platforms a prior send to a closed port
    /// reports back here, and it says nothing about our own socket.
    pub fn poll_once(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut buf = [0u8; MAX_DATAGRAM];
        match self.socket.recv_from(&mut buf) {
            Ok((0, _)) => Ok(None),
            Ok((len, peer)) => {
                trace!(bytes = len, %peer, "command datagram received");
                Ok(Some(buf[..len].to_vec()))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::ConnectionReset) => {
                Ok(None)
            }
            Err(e) => Err(TransportError::Receive(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    fn bound_listener() -> CommandListener {
        CommandListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).unwrap()
    }

    #[test]
    fn empty_queue_is_not_an_error() {
        let listener = bound_listener();
        assert!(listener.poll_once().unwrap().is_none());
    }

    #[test]
    fn receives_one_datagram_per_poll() {
        let listener = bound_listener();
        let addr = listener.local_addr().unwrap();

        let sender = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        sender.send_to(b"{\"type\":\"refresh\"}", addr).unwrap();
        sender.send_to(b"second", addr).unwrap();

        // UDP delivery on loopback is immediate, but give the kernel a beat.
        std::thread::sleep(std::time::Duration::from_millis(20));

        assert_eq!(
            listener.poll_once().unwrap().as_deref(),
            Some(&b"{\"type\":\"refresh\"}"[..])
        );
        assert_eq!(listener.poll_once().unwrap().as_deref(), Some(&b"second"[..]));
        assert!(listener.poll_once().unwrap().is_none());
    }
}
