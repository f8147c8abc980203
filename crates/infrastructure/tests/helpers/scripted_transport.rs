#![allow(dead_code)]
use async_trait::async_trait;
use rootwalk_infrastructure::dns::{DnsTransport, TransportError, TransportResponse};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Reply = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// What a scripted server does with a query.
#[derive(Clone)]
pub enum Behavior {
    /// Replies with whatever the closure builds from the query bytes.
    Reply(Reply),
    /// Waits out the full timeout, then reports no response.
    Silent,
    /// Fails at once the way an ICMP port-unreachable does.
    Refused,
    /// Fails the local socket.
    SocketError,
}

impl Behavior {
    pub fn reply<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        Behavior::Reply(Arc::new(f))
    }
}

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub server: SocketAddr,
    pub id: u16,
    pub bytes: Vec<u8>,
}

/// An in-memory transport that plays back per-server behaviors and records
/// every exchange in order. Servers without a script stay silent.
#[derive(Default)]
pub struct ScriptedTransport {
    script: HashMap<SocketAddr, Behavior>,
    calls: Mutex<Vec<Call>>,
    rtt: Duration,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            rtt: Duration::from_millis(5),
            ..Default::default()
        }
    }

    pub fn on(mut self, server: SocketAddr, behavior: Behavior) -> Self {
        self.script.insert(server, behavior);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn servers_called(&self) -> Vec<SocketAddr> {
        self.calls().into_iter().map(|c| c.server).collect()
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn exchange(
        &self,
        message_bytes: &[u8],
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            server,
            id: u16::from_be_bytes([message_bytes[0], message_bytes[1]]),
            bytes: message_bytes.to_vec(),
        });

        match self.script.get(&server).cloned().unwrap_or(Behavior::Silent) {
            Behavior::Reply(reply) => Ok(TransportResponse {
                bytes: reply(message_bytes),
                rtt: self.rtt,
            }),
            Behavior::Silent => {
                tokio::time::sleep(timeout).await;
                Err(TransportError::Timeout)
            }
            Behavior::Refused => Err(TransportError::Refused(format!(
                "{} answered with port unreachable",
                server
            ))),
            Behavior::SocketError => Err(TransportError::Socket("network is down".to_string())),
        }
    }
}
