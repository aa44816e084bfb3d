//! Inbound command messages, external peer to host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message types the bridge accepts on the inbound channel.
const KNOWN_TYPES: [&str; 11] = [
    "setGroundState",
    "setClearedToLand",
    "refresh",
    "assume",
    "transfer",
    "resetSquawk",
    "toggleClearanceFlag",
    "assignDepartureRunway",
    "assignSid",
    "assignHeading",
    "assignCfl",
];

/// Why an inbound datagram could not be turned into a command.
///
/// Unknown types are kept distinct from malformed payloads: the former get a
/// dedicated operator message, the latter a generic parse report. Both are
/// non-fatal to the tick loop.
#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("malformed command message: {0}")]
    Malformed(String),

    #[error("message has no type field")]
    MissingType,

    #[error("unknown message type: {0}")]
    UnknownType(String),
}

/// One inbound command, dispatched by its wire `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundCommand {
    #[serde(rename = "setGroundState")]
    SetGroundState { callsign: String, state: String },

    #[serde(rename = "setClearedToLand")]
    SetClearedToLand { callsign: String },

    #[serde(rename = "refresh")]
    Refresh,

    #[serde(rename = "assume")]
    Assume { callsign: String },

    #[serde(rename = "transfer")]
    Transfer { callsign: String },

    #[serde(rename = "resetSquawk")]
    ResetSquawk { callsign: String },

    #[serde(rename = "toggleClearanceFlag")]
    ToggleClearanceFlag { callsign: String },

    #[serde(rename = "assignDepartureRunway")]
    AssignDepartureRunway { callsign: String, runway: String },

    #[serde(rename = "assignSid")]
    AssignSid { callsign: String, sid: String },

    #[serde(rename = "assignHeading")]
    AssignHeading { callsign: String, heading: i32 },

    #[serde(rename = "assignCfl")]
    AssignCfl { callsign: String, altitude: i32 },
}

impl InboundCommand {
    /// Parse one datagram payload.
    ///
    /// The `type` field is inspected first so that an unknown type is
    /// reported as such rather than as a generic deserialization error.
    pub fn parse(bytes: &[u8]) -> Result<Self, CommandParseError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| CommandParseError::Malformed(e.to_string()))?;

        let message_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(CommandParseError::MissingType)?;

        if !KNOWN_TYPES.contains(&message_type) {
            return Err(CommandParseError::UnknownType(message_type.to_string()));
        }

        serde_json::from_value(value).map_err(|e| CommandParseError::Malformed(e.to_string()))
    }
}
