pub mod iterative;
pub mod transport;

pub use iterative::{IdSource, IterativeResolver, RandomIds, SeededIds};
pub use transport::{DnsTransport, TransportError, TransportResponse, UdpTransport};
