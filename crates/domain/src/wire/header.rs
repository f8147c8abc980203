use super::{read_u16, slice};
use crate::errors::WireError;

pub const HEADER_LEN: usize = 12;

/// The fixed 12-byte message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub qd_count: u16,
    pub an_count: u16,
    pub ns_count: u16,
    pub ar_count: u16,
}

impl Header {
    pub const FLAG_QR: u16 = 0x8000;
    pub const FLAG_AA: u16 = 0x0400;
    pub const FLAG_TC: u16 = 0x0200;
    pub const FLAG_RD: u16 = 0x0100;
    pub const FLAG_RA: u16 = 0x0080;

    /// Header of a standard query with a single question and RD set.
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: Self::FLAG_RD,
            qd_count: 1,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    pub fn is_response(&self) -> bool {
        self.flags & Self::FLAG_QR != 0
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & Self::FLAG_AA != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & Self::FLAG_TC != 0
    }

    pub fn recursion_desired(&self) -> bool {
        self.flags & Self::FLAG_RD != 0
    }

    pub fn recursion_available(&self) -> bool {
        self.flags & Self::FLAG_RA != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags >> 11) & 0x0F) as u8
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & 0x000F) as u8
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        for field in [
            self.id,
            self.flags,
            self.qd_count,
            self.an_count,
            self.ns_count,
            self.ar_count,
        ] {
            out.extend_from_slice(&field.to_be_bytes());
        }
    }

    pub fn read(buf: &[u8]) -> Result<Self, WireError> {
        slice(buf, 0, HEADER_LEN)?;
        Ok(Self {
            id: read_u16(buf, 0)?,
            flags: read_u16(buf, 2)?,
            qd_count: read_u16(buf, 4)?,
            an_count: read_u16(buf, 6)?,
            ns_count: read_u16(buf, 8)?,
            ar_count: read_u16(buf, 10)?,
        })
    }
}
