//! Wire protocol: newline-delimited JSON over two local datagram channels.
//!
//! Every message carries a string `type` discriminator. [`OutboundEvent`]
//! covers the host-to-peer direction, [`InboundCommand`] the peer-to-host
//! direction. Optional fields are omitted from the JSON object entirely when
//! absent; the normalizer never emits a defaulted placeholder for a field
//! that failed validation.

mod inbound;
mod outbound;

pub use inbound::{CommandParseError, InboundCommand};
pub use outbound::{
    AirportRunwayConfig, OutboundEvent, RunwayConfig, RunwayConfigEntry,
};
