//! The delegation walk's vocabulary: stages, candidate servers, referrals
//! and the diagnostic trail handed back to callers.

use crate::dns_record::{RecordData, RecordType, ResourceRecord};
use crate::errors::FailedAttempt;
use crate::wire::{Header, Message};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// One tier of the delegation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Root,
    Tld,
    Authoritative,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Root, Stage::Tld, Stage::Authoritative];

    /// The stage fed by this stage's referral, `None` after the last one.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Root => Some(Stage::Tld),
            Stage::Tld => Some(Stage::Authoritative),
            Stage::Authoritative => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Root => "root",
            Stage::Tld => "TLD",
            Stage::Authoritative => "authoritative",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// A candidate returned a well-formed, matching response.
    Answered,
    /// No candidate responded.
    Exhausted,
    /// Every candidate failed and at least one replied with bytes that could
    /// not be decoded.
    Malformed,
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageOutcome::Answered => "answered",
            StageOutcome::Exhausted => "exhausted",
            StageOutcome::Malformed => "malformed",
        })
    }
}

/// A server to try during one stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub address: IpAddr,
}

impl Candidate {
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.address)
    }
}

/// Parses `NAME=IP` or a bare `IP` (which then doubles as the name).
impl FromStr for Candidate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, addr) = match s.split_once('=') {
            Some((name, addr)) => (name.trim(), addr.trim()),
            None => (s.trim(), s.trim()),
        };
        if name.is_empty() {
            return Err(format!("Missing server name in '{}'", s));
        }
        let address = addr
            .parse::<IpAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", addr, e))?;
        Ok(Candidate::new(name, address))
    }
}

/// What a referral response points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Referral {
    /// `(zone, nameserver)` pairs from the authority section.
    pub nameservers: Vec<(String, String)>,
    /// IPv4 glue from the additional section, in message order.
    pub glue: Vec<Candidate>,
    /// IPv6 glue; reported but never queried.
    pub ipv6_glue: Vec<Candidate>,
}

impl Referral {
    pub fn from_message(message: &Message) -> Self {
        let nameservers = message
            .delegations()
            .map(|(zone, ns)| (zone.to_string(), ns.to_string()))
            .collect();

        let mut glue: Vec<Candidate> = Vec::new();
        let mut ipv6_glue: Vec<Candidate> = Vec::new();
        for rr in &message.additionals {
            let (list, address) = match rr.data {
                RecordData::A(v4) => (&mut glue, IpAddr::V4(v4)),
                RecordData::Aaaa(v6) => (&mut ipv6_glue, IpAddr::V6(v6)),
                RecordData::Ns(_) | RecordData::Other(_) => continue,
            };
            if !list.iter().any(|c| c.address == address) {
                list.push(Candidate::new(rr.name.clone(), address));
            }
        }

        Self {
            nameservers,
            glue,
            ipv6_glue,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glue.is_empty()
    }
}

/// Diagnostics for one completed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub responder: Candidate,
    pub rtt: Duration,
    pub header: Header,
    pub referral: Referral,
    /// Candidates tried and skipped before `responder` answered.
    pub failures: Vec<FailedAttempt>,
    pub message: Message,
}

/// One address the authoritative server returned for the queried name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub name: String,
    pub record_type: RecordType,
    pub ttl: u32,
    pub address: IpAddr,
}

impl ResolvedAddress {
    pub fn from_record(rr: &ResourceRecord) -> Option<Self> {
        let record_type = rr.record_type().filter(RecordType::is_address)?;
        Some(Self {
            name: rr.name.clone(),
            record_type,
            ttl: rr.ttl,
            address: rr.ip_addr()?,
        })
    }
}

/// A completed walk: the answer set plus the trail that produced it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub hostname: String,
    pub record_type: RecordType,
    pub answers: Vec<ResolvedAddress>,
    /// Round trip of the winning authoritative exchange.
    pub rtt: Duration,
    pub trail: Vec<StageReport>,
    pub elapsed: Duration,
}

impl Resolution {
    pub fn first_ipv4(&self) -> Option<&ResolvedAddress> {
        self.answers.iter().find(|a| a.address.is_ipv4())
    }

    pub fn report(&self, stage: Stage) -> Option<&StageReport> {
        self.trail.iter().find(|r| r.stage == stage)
    }
}
