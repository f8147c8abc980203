pub mod builders;
pub mod dns_server_mock;
pub mod scripted_transport;

pub use builders::ResponseBuilder;
pub use dns_server_mock::MockDnsServer;
pub use scripted_transport::{Behavior, ScriptedTransport};
