//! Rootwalk domain layer: wire codec, resolution model, configuration.
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod resolution;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError, ResolverConfig};
pub use dns_record::{RecordData, RecordType, ResourceRecord};
pub use errors::{ExchangeError, FailedAttempt, ResolutionError, StageFailure, WireError};
pub use resolution::{
    Candidate, Referral, Resolution, ResolvedAddress, Stage, StageOutcome, StageReport,
};
pub use wire::{Header, Message, Query, Question};
