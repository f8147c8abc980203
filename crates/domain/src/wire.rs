//! DNS wire format (RFC 1035 §4).
//!
//! Queries are encoded without compression; responses are decoded strictly:
//! every record announced by the header must be present and parse, and
//! nothing may follow the last one.

pub mod header;
pub mod message;
pub mod name;
pub mod query;

pub use header::{Header, HEADER_LEN};
pub use message::Message;
pub use name::{decode_name, encode_name, names_equal, MAX_LABEL_LEN, MAX_POINTER_HOPS};
pub use query::{Query, Question};

use crate::errors::WireError;

/// The Internet class.
pub const CLASS_IN: u16 = 1;

/// Bounds-checked slice of `len` bytes at `offset`.
pub(crate) fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], WireError> {
    offset
        .checked_add(len)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| WireError::truncated(offset, len))
}

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> Result<u16, WireError> {
    let bytes = slice(buf, offset, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> Result<u32, WireError> {
    let bytes = slice(buf, offset, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
