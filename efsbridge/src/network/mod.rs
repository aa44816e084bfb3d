//! UDP transport: outbound event publishing and inbound command polling.

mod error;
mod listener;
mod publisher;

pub use error::TransportError;
pub use listener::CommandListener;
pub use publisher::EventPublisher;
