//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One socket serves every exchange of a resolution. Messages are sent as-is
//! (no framing) and replies are read into a fixed buffer; no EDNS(0) is
//! advertised, so well-behaved servers stay within 512 bytes.

use super::{DnsTransport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Receive buffer size; larger datagrams are cut by the kernel and then fail
/// to decode.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds an ephemeral IPv4 port (0 = OS assigns).
    pub async fn bind() -> Result<Self, TransportError> {
        Self::bind_to(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))).await
    }

    pub async fn bind_to(addr: SocketAddr) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            TransportError::Socket(format!("Failed to bind UDP socket on {}: {}", addr, e))
        })?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket
            .local_addr()
            .map_err(|e| TransportError::Socket(format!("Failed to read local address: {}", e)))
    }
}

fn classify(err: io::Error, action: &str, server: SocketAddr) -> TransportError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => {
            TransportError::Refused(format!("{} {}: {}", action, server, err))
        }
        _ => TransportError::Socket(format!("Failed to {} {}: {}", action, server, err)),
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(
        &self,
        message_bytes: &[u8],
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let local = self.local_addr()?;
        if local.is_ipv4() != server.is_ipv4() {
            return Err(TransportError::Unreachable(format!(
                "{} is not reachable from a socket bound to {}",
                server, local
            )));
        }

        let started = Instant::now();
        let deadline = started + timeout;

        let bytes_sent = self
            .socket
            .send_to(message_bytes, server)
            .await
            .map_err(|e| classify(e, "send UDP query to", server))?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        loop {
            let (bytes_received, from_addr) =
                tokio::time::timeout_at(deadline, self.socket.recv_from(&mut recv_buf))
                    .await
                    .map_err(|_| TransportError::Timeout)?
                    .map_err(|e| classify(e, "receive UDP response from", server))?;

            // A late reply from an earlier candidate is not an answer from
            // this one; keep waiting for the rest of this exchange's window.
            if from_addr != server {
                warn!(
                    expected = %server,
                    received_from = %from_addr,
                    bytes = bytes_received,
                    "Ignoring UDP datagram from unexpected source"
                );
                continue;
            }

            let rtt = started.elapsed();
            recv_buf.truncate(bytes_received);

            debug!(
                server = %server,
                bytes_received = bytes_received,
                rtt_ms = rtt.as_secs_f64() * 1000.0,
                "UDP response received"
            );

            return Ok(TransportResponse {
                bytes: recv_buf,
                rtt,
            });
        }
    }
}
