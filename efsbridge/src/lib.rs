//! EFS Bridge - state synchronization between an ATC simulation host and an
//! external electronic-flight-strip client.
//!
//! The library relays structured air-traffic state (flight plans, controller
//! assignments, radar tracks) as newline-delimited JSON datagrams to a local
//! peer, and translates a small set of inbound JSON commands back into
//! host-model mutations (tracking, handoff, scratch-pad and route surgery).
//!
//! # High-Level API
//!
//! The host side is abstracted behind the [`host::Host`] capability trait; a
//! host adapter constructs a [`bridge::Bridge`] and forwards its event
//! callbacks and timer ticks:
//!
//! ```
//! use efsbridge::bridge::Bridge;
//! use efsbridge::config::BridgeSettings;
//! use efsbridge::host::fake::FakeHost;
//!
//! let mut bridge = Bridge::new(FakeHost::default(), BridgeSettings::default());
//! bridge.on_timer(0); // no live session yet, stays disabled
//! ```

pub mod bridge;
pub mod commands;
pub mod config;
pub mod encoding;
pub mod events;
pub mod host;
pub mod network;
pub mod protocol;

/// Version of the bridge, reported to the external peer in `myselfUpdate`.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
