use crate::resolution::{Candidate, Stage, StageOutcome};
use std::time::Duration;
use thiserror::Error;

/// Failures raised while encoding or decoding DNS wire-format messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Label '{label}' is {len} octets long (max 63)")]
    NameTooLong { label: String, len: usize },

    #[error("Empty label in domain name")]
    EmptyLabel,

    #[error("Message truncated: needed {needed} bytes at offset {offset}")]
    TruncatedMessage { offset: usize, needed: usize },

    #[error("Compression pointer loop after {hops} hops")]
    PointerLoop { hops: usize },

    #[error("Unsupported label type 0x{0:02x}")]
    UnsupportedLabel(u8),

    #[error("Invalid rdata length {len} for record type {rtype}")]
    BadRdataLength { rtype: u16, len: usize },

    #[error("Record data of type {rtype} overruns its declared length")]
    RdataOverrun { rtype: u16 },

    #[error("{0} unexpected bytes after the last record")]
    TrailingBytes(usize),
}

impl WireError {
    pub(crate) fn truncated(offset: usize, needed: usize) -> Self {
        WireError::TruncatedMessage { offset, needed }
    }
}

/// Why a single candidate server did not produce a usable answer.
///
/// These never escape the engine on their own; they are collected into the
/// stage trail and only surface through a [`StageFailure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("no response")]
    Timeout,

    #[error("malformed response: {0}")]
    Malformed(WireError),

    #[error("transaction id mismatch: expected {expected:#06x}, received {received:#06x}")]
    IdMismatch { expected: u16, received: u16 },

    #[error("response question does not echo the request")]
    QuestionMismatch,

    #[error("message is not a response (QR bit clear)")]
    NotAResponse,

    #[error("server refused the datagram: {0}")]
    Refused(String),

    #[error("server unreachable: {0}")]
    Unreachable(String),
}

impl From<WireError> for ExchangeError {
    fn from(err: WireError) -> Self {
        ExchangeError::Malformed(err)
    }
}

/// A candidate that was tried and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub candidate: Candidate,
    pub error: ExchangeError,
}

/// Why a stage could not hand anything to the next one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageFailure {
    #[error("{outcome} after trying {} candidate(s)", attempts.len())]
    Exhausted {
        outcome: StageOutcome,
        attempts: Vec<FailedAttempt>,
    },

    #[error("{server} answered without usable next-hop addresses")]
    NoReferral { server: Candidate },
}

impl StageFailure {
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            StageFailure::Exhausted { attempts, .. } => attempts,
            StageFailure::NoReferral { .. } => &[],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Invalid hostname: {0}")]
    InvalidHostname(WireError),

    #[error("No root server response: {0}")]
    NoRootResponse(StageFailure),

    #[error("No TLD server response: {0}")]
    NoTldResponse(StageFailure),

    #[error("No authoritative server response: {0}")]
    NoAuthoritativeResponse(StageFailure),

    #[error("Authoritative server {server} returned no address records (rcode {rcode})")]
    EmptyAnswer { server: Candidate, rcode: u8 },

    #[error("Socket error: {0}")]
    SocketError(String),

    #[error("Resolution deadline exceeded during {stage} stage after {elapsed:?}")]
    DeadlineExceeded { stage: Stage, elapsed: Duration },
}

impl ResolutionError {
    /// Maps a failed stage onto the error variant naming that stage.
    pub fn stage_failed(stage: Stage, failure: StageFailure) -> Self {
        match stage {
            Stage::Root => ResolutionError::NoRootResponse(failure),
            Stage::Tld => ResolutionError::NoTldResponse(failure),
            Stage::Authoritative => ResolutionError::NoAuthoritativeResponse(failure),
        }
    }

    /// The stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ResolutionError::NoRootResponse(_) => Some(Stage::Root),
            ResolutionError::NoTldResponse(_) => Some(Stage::Tld),
            ResolutionError::NoAuthoritativeResponse(_) | ResolutionError::EmptyAnswer { .. } => {
                Some(Stage::Authoritative)
            }
            ResolutionError::DeadlineExceeded { stage, .. } => Some(*stage),
            ResolutionError::InvalidHostname(_) | ResolutionError::SocketError(_) => None,
        }
    }
}
