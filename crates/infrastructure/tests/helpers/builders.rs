#![allow(dead_code)]
use rootwalk_domain::wire::{encode_name, names_equal, Header, HEADER_LEN};
use rootwalk_domain::Message;
use std::net::{Ipv4Addr, Ipv6Addr};

const TYPE_A: u16 = 1;
const TYPE_NS: u16 = 2;
const TYPE_AAAA: u16 = 28;

/// Builds a wire-format response to a captured query.
///
/// Owner names equal to the question name are written as a pointer to
/// offset 12; every other name is written in full.
pub struct ResponseBuilder {
    id: u16,
    flags: u16,
    qname: String,
    question: Vec<u8>,
    answers: Vec<Vec<u8>>,
    authorities: Vec<Vec<u8>>,
    additionals: Vec<Vec<u8>>,
    trailing: Vec<u8>,
}

impl ResponseBuilder {
    pub fn for_query(query: &[u8]) -> Self {
        let parsed = Message::decode(query).expect("query must decode");
        let qname = parsed
            .question()
            .map(|q| q.name.clone())
            .unwrap_or_default();

        Self {
            id: parsed.header.id,
            flags: Header::FLAG_QR | (parsed.header.flags & Header::FLAG_RD),
            qname,
            question: query[HEADER_LEN..].to_vec(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.flags |= Header::FLAG_AA;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.flags = (self.flags & !0x000F) | u16::from(rcode & 0x0F);
        self
    }

    pub fn answer_a(mut self, name: &str, addr: Ipv4Addr) -> Self {
        let record = self.record(name, TYPE_A, &addr.octets());
        self.answers.push(record);
        self
    }

    pub fn answer_aaaa(mut self, name: &str, addr: Ipv6Addr) -> Self {
        let record = self.record(name, TYPE_AAAA, &addr.octets());
        self.answers.push(record);
        self
    }

    pub fn answer_raw(mut self, name: &str, rtype: u16, rdata: &[u8]) -> Self {
        let record = self.record(name, rtype, rdata);
        self.answers.push(record);
        self
    }

    pub fn authority_ns(mut self, zone: &str, ns: &str) -> Self {
        let mut rdata = Vec::new();
        encode_name(ns, &mut rdata).expect("valid nameserver name");
        let record = self.record(zone, TYPE_NS, &rdata);
        self.authorities.push(record);
        self
    }

    pub fn additional_a(mut self, name: &str, addr: Ipv4Addr) -> Self {
        let record = self.record(name, TYPE_A, &addr.octets());
        self.additionals.push(record);
        self
    }

    pub fn additional_aaaa(mut self, name: &str, addr: Ipv6Addr) -> Self {
        let record = self.record(name, TYPE_AAAA, &addr.octets());
        self.additionals.push(record);
        self
    }

    /// Appends raw bytes after the last record.
    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header = Header {
            id: self.id,
            flags: self.flags,
            qd_count: 1,
            an_count: self.answers.len() as u16,
            ns_count: self.authorities.len() as u16,
            ar_count: self.additionals.len() as u16,
        };

        let mut out = Vec::with_capacity(512);
        header.write(&mut out);
        out.extend_from_slice(&self.question);
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            out.extend_from_slice(record);
        }
        out.extend_from_slice(&self.trailing);
        out
    }

    fn record(&self, owner: &str, rtype: u16, rdata: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        if names_equal(owner, &self.qname) {
            out.extend_from_slice(&[0xC0, 0x0C]);
        } else {
            encode_name(owner, &mut out).expect("valid owner name");
        }
        out.extend_from_slice(&rtype.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&3600u32.to_be_bytes());
        out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        out.extend_from_slice(rdata);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootwalk_domain::Query;

    #[test]
    fn test_builder_output_decodes() {
        let query = Query::new(0x1234, "example.com", 1, 1).unwrap();
        let bytes = ResponseBuilder::for_query(query.as_bytes())
            .authoritative()
            .answer_a("example.com", Ipv4Addr::new(93, 184, 216, 34))
            .build();

        let message = Message::decode(&bytes).unwrap();
        assert!(query.validate_response(&message).is_ok());
        assert_eq!(message.answers[0].name, "example.com");
    }
}
