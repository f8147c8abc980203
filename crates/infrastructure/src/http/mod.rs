//! Plaintext HTTP probe against a resolved address.
//!
//! Consumes only [`rootwalk_domain::ResolvedAddress`]; it has no knowledge
//! of how the address was found.

pub mod probe;

pub use probe::{FetchError, HttpFetch, HttpProbe};
