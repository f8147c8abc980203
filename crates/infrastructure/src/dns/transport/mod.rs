pub mod udp;

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    /// Time from handing the query to the socket until the reply arrived.
    pub rtt: Duration,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    /// The remote end rejected the datagram (ICMP port/host unreachable).
    #[error("{0}")]
    Refused(String),

    /// The server cannot be reached from this socket's address family.
    #[error("{0}")]
    Unreachable(String),

    /// Local socket failure; nothing sent over this transport can succeed.
    #[error("{0}")]
    Socket(String),
}

/// One request/response exchange with a single server.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn exchange(
        &self,
        message_bytes: &[u8],
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}
