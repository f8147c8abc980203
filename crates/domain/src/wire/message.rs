use super::name::decode_name;
use super::{read_u16, read_u32, slice, Header, Question, HEADER_LEN};
use crate::dns_record::{RecordData, RecordType, ResourceRecord};
use crate::errors::WireError;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Size of the type/class/ttl/rdlength block following a record's owner name.
const RR_FIXED_LEN: usize = 10;

/// A fully decoded DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Decodes `buf` as one complete message.
    ///
    /// Fails if any counted question or record cannot be read in full, or if
    /// bytes remain after the last record. Partial results are never
    /// returned.
    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        let header = Header::read(buf)?;
        let mut pos = HEADER_LEN;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        for _ in 0..header.qd_count {
            let (question, next) = read_question(buf, pos)?;
            questions.push(question);
            pos = next;
        }

        let answers = read_section(buf, &mut pos, header.an_count)?;
        let authorities = read_section(buf, &mut pos, header.ns_count)?;
        let additionals = read_section(buf, &mut pos, header.ar_count)?;

        if pos != buf.len() {
            return Err(WireError::TrailingBytes(buf.len() - pos));
        }

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Answer records carrying an IPv4 or IPv6 address.
    pub fn address_answers(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers.iter().filter(|rr| {
            rr.record_type()
                .map(|rt| rt.is_address())
                .unwrap_or(false)
        })
    }

    /// NS records of the authority section as `(zone, nameserver)` pairs.
    pub fn delegations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.authorities
            .iter()
            .filter_map(|rr| rr.nameserver().map(|ns| (rr.name.as_str(), ns)))
    }
}

fn read_question(buf: &[u8], pos: usize) -> Result<(Question, usize), WireError> {
    let (name, pos) = decode_name(buf, pos)?;
    let qtype = read_u16(buf, pos)?;
    let qclass = read_u16(buf, pos + 2)?;
    Ok((
        Question {
            name,
            qtype,
            qclass,
        },
        pos + 4,
    ))
}

fn read_section(
    buf: &[u8],
    pos: &mut usize,
    count: u16,
) -> Result<Vec<ResourceRecord>, WireError> {
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (record, next) = read_record(buf, *pos)?;
        records.push(record);
        *pos = next;
    }
    Ok(records)
}

fn read_record(buf: &[u8], pos: usize) -> Result<(ResourceRecord, usize), WireError> {
    let (name, pos) = decode_name(buf, pos)?;
    slice(buf, pos, RR_FIXED_LEN)?;

    let rtype = read_u16(buf, pos)?;
    let class = read_u16(buf, pos + 2)?;
    let ttl = read_u32(buf, pos + 4)?;
    let rdlength = read_u16(buf, pos + 8)? as usize;

    let rdata_start = pos + RR_FIXED_LEN;
    let rdata = slice(buf, rdata_start, rdlength)?;
    let rdata_end = rdata_start + rdlength;

    let data = match RecordType::from_u16(rtype) {
        Some(RecordType::A) => {
            let octets: [u8; 4] = rdata
                .try_into()
                .map_err(|_| WireError::BadRdataLength { rtype, len: rdlength })?;
            RecordData::A(Ipv4Addr::from(octets))
        }
        Some(RecordType::AAAA) => {
            let octets: [u8; 16] = rdata
                .try_into()
                .map_err(|_| WireError::BadRdataLength { rtype, len: rdlength })?;
            RecordData::Aaaa(Ipv6Addr::from(octets))
        }
        Some(RecordType::NS) => {
            // The nameserver may be compressed against any earlier name, so
            // decode against the whole buffer and check it stays in bounds.
            let (ns, end) = decode_name(buf, rdata_start)?;
            if end > rdata_end {
                return Err(WireError::RdataOverrun { rtype });
            }
            if end < rdata_end {
                return Err(WireError::BadRdataLength { rtype, len: rdlength });
            }
            RecordData::Ns(ns)
        }
        _ => RecordData::Other(rdata.to_vec()),
    };

    Ok((
        ResourceRecord {
            name,
            rtype,
            class,
            ttl,
            data,
        },
        rdata_end,
    ))
}
