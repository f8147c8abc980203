use reqwest::header::{ACCEPT, CONNECTION, HOST};
use rootwalk_domain::{Resolution, ResolvedAddress};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

const DEFAULT_HTTP_PORT: u16 = 80;
const USER_AGENT: &str = concat!("rootwalk/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No IPv4 address to fetch from")]
    NoIpv4Address,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Timeout talking to {0}")]
    Timeout(SocketAddr),

    #[error("Connection to {addr} failed: {reason}")]
    Connect { addr: SocketAddr, reason: String },

    #[error("HTTP request to {addr} failed: {reason}")]
    Request { addr: SocketAddr, reason: String },

    #[error("Failed to read HTTP body from {addr}: {reason}")]
    Body { addr: SocketAddr, reason: String },
}

impl FetchError {
    fn from_reqwest(addr: SocketAddr, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(addr)
        } else if e.is_connect() {
            FetchError::Connect {
                addr,
                reason: e.to_string(),
            }
        } else if e.is_body() || e.is_decode() {
            FetchError::Body {
                addr,
                reason: e.to_string(),
            }
        } else {
            FetchError::Request {
                addr,
                reason: e.to_string(),
            }
        }
    }
}

/// A completed `GET /`.
#[derive(Debug, Clone)]
pub struct HttpFetch {
    pub address: SocketAddr,
    pub host: String,
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// From sending the request until the whole body was read.
    pub rtt: Duration,
}

impl HttpFetch {
    pub fn status_code(&self) -> Option<u16> {
        self.status_line.split_whitespace().nth(1)?.parse().ok()
    }
}

/// Plaintext `GET /` against a resolved address, with the hostname in
/// `Host`. Redirects are reported, not followed.
pub struct HttpProbe {
    client: reqwest::Client,
    port: u16,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            port: DEFAULT_HTTP_PORT,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Fetches from the first IPv4 answer of `resolution`.
    pub async fn fetch_first(&self, resolution: &Resolution) -> Result<HttpFetch, FetchError> {
        let target = resolution.first_ipv4().ok_or(FetchError::NoIpv4Address)?;
        self.fetch(target).await
    }

    pub async fn fetch(&self, target: &ResolvedAddress) -> Result<HttpFetch, FetchError> {
        let addr = SocketAddr::new(target.address, self.port);
        let url = format!("http://{}/", addr);
        let started = Instant::now();

        let response = self
            .client
            .get(&url)
            .header(HOST, target.name.as_str())
            .header(CONNECTION, "close")
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(addr, e))?;

        let status = response.status();
        let status_line = format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )
        .trim_end()
        .to_string();

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(addr, e))?
            .to_vec();
        let rtt = started.elapsed();

        debug!(
            server = %addr,
            status = %status_line,
            body_bytes = body.len(),
            rtt_ms = rtt.as_secs_f64() * 1000.0,
            "HTTP fetch complete"
        );

        Ok(HttpFetch {
            address: addr,
            host: target.name.clone(),
            status_line,
            headers,
            body,
            rtt,
        })
    }
}
