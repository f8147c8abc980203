//! Rootwalk infrastructure: sockets, the iterative resolution engine and the
//! application-layer HTTP probe.
pub mod dns;
pub mod http;
