use super::name::{encode_name, names_equal};
use super::{Header, Message};
use crate::errors::{ExchangeError, WireError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    /// True when `other` asks the same thing, comparing names
    /// case-insensitively.
    pub fn same_as(&self, other: &Question) -> bool {
        self.qtype == other.qtype
            && self.qclass == other.qclass
            && names_equal(&self.name, &other.name)
    }
}

/// An encoded single-question query, ready to be sent as-is.
#[derive(Debug, Clone)]
pub struct Query {
    id: u16,
    question: Question,
    bytes: Vec<u8>,
}

impl Query {
    /// Encodes a standard query for `name`.
    ///
    /// The transaction id is supplied by the caller so the encoding is a pure
    /// function of its inputs.
    pub fn new(id: u16, name: &str, qtype: u16, qclass: u16) -> Result<Self, WireError> {
        let mut bytes = Vec::with_capacity(512);
        Header::query(id).write(&mut bytes);
        encode_name(name, &mut bytes)?;
        bytes.extend_from_slice(&qtype.to_be_bytes());
        bytes.extend_from_slice(&qclass.to_be_bytes());

        let name = name.strip_suffix('.').unwrap_or(name).to_string();

        Ok(Self {
            id,
            question: Question {
                name,
                qtype,
                qclass,
            },
            bytes,
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Checks that `response` answers this query: QR set, same transaction
    /// id, and the question echoed back unchanged.
    pub fn validate_response(&self, response: &Message) -> Result<(), ExchangeError> {
        if response.header.id != self.id {
            return Err(ExchangeError::IdMismatch {
                expected: self.id,
                received: response.header.id,
            });
        }
        if !response.header.is_response() {
            return Err(ExchangeError::NotAResponse);
        }
        match response.question() {
            Some(echoed) if response.questions.len() == 1 && echoed.same_as(&self.question) => {
                Ok(())
            }
            _ => Err(ExchangeError::QuestionMismatch),
        }
    }
}
