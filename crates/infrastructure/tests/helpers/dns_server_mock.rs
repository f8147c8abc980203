#![allow(dead_code)]
use super::builders::ResponseBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

type Handler = Arc<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

/// A loopback UDP server answering through a handler. `None` from the
/// handler means stay silent.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(addr: SocketAddr, handler: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        let handler: Handler = Arc::new(handler);
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&queries);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            counter.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = handler(&buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr: local_addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Reads every query and never answers.
    pub async fn silent(addr: SocketAddr) -> Result<Self, std::io::Error> {
        Self::start(addr, |_| None).await
    }

    /// Answers every query with 93.184.216.34.
    pub async fn answering(addr: SocketAddr) -> Result<Self, std::io::Error> {
        Self::start(addr, |query| Some(build_mock_response(query))).await
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries_received(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub fn build_mock_response(query: &[u8]) -> Vec<u8> {
    let name = rootwalk_domain::Message::decode(query)
        .ok()
        .and_then(|m| m.question().map(|q| q.name.clone()))
        .unwrap_or_default();

    ResponseBuilder::for_query(query)
        .authoritative()
        .answer_a(&name, Ipv4Addr::new(93, 184, 216, 34))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootwalk_domain::{Message, Query};
    use std::time::Duration;

    #[tokio::test]
    async fn test_mock_server_responds() {
        let server = MockDnsServer::answering("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let query = Query::new(0xabcd, "example.com", 1, 1).unwrap();
        client.send_to(query.as_bytes(), server.addr()).await.unwrap();

        let mut buf = vec![0u8; 512];
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), client.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();

        let message = Message::decode(&buf[..len]).unwrap();
        assert_eq!(message.header.id, 0xabcd);
        assert!(message.header.is_response());
        assert_eq!(server.queries_received(), 1);
    }
}
