use super::RecordType;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Type-specific payload of a resource record.
///
/// Only the types needed to walk a delegation chain are interpreted; every
/// other type keeps its raw rdata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Other(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    pub data: RecordData,
}

impl ResourceRecord {
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.rtype)
    }

    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self.data {
            RecordData::A(v4) => Some(IpAddr::V4(v4)),
            RecordData::Aaaa(v6) => Some(IpAddr::V6(v6)),
            RecordData::Ns(_) | RecordData::Other(_) => None,
        }
    }

    pub fn nameserver(&self) -> Option<&str> {
        match &self.data {
            RecordData::Ns(ns) => Some(ns),
            _ => None,
        }
    }
}
