use super::root_hints::default_root_servers;
use crate::dns_record::RecordType;
use crate::resolution::Candidate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// How long one exchange waits for a reply before moving to the next
    /// candidate.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Upper bound on a whole resolution. Unset means only the per-exchange
    /// timeout applies.
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Destination port for every stage.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_record_type")]
    pub record_type: RecordType,

    #[serde(default = "default_root_servers")]
    pub root_servers: Vec<Candidate>,
}

impl ResolverConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn with_root_servers(mut self, root_servers: Vec<Candidate>) -> Self {
        self.root_servers = root_servers;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            deadline_ms: None,
            port: default_port(),
            record_type: default_record_type(),
            root_servers: default_root_servers(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    10_000
}

fn default_port() -> u16 {
    53
}

fn default_record_type() -> RecordType {
    RecordType::A
}
