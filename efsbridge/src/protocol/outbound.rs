//! Outbound event messages, host to external peer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Active-state flags for one airport: either a plain `arr`/`dep` flag from
/// the airport element itself, or a per-runway flag map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunwayConfigEntry {
    Active(bool),
    Runway(BTreeMap<String, bool>),
}

/// Flags keyed by `"arr"`/`"dep"` or by runway name, for one airport.
pub type AirportRunwayConfig = BTreeMap<String, RunwayConfigEntry>;

/// Airport code to active-configuration mapping, sent with `myselfUpdate`.
pub type RunwayConfig = BTreeMap<String, AirportRunwayConfig>;

/// One outbound JSON event.
///
/// The variant name (via the serde rename) is the wire `type` field. Field
/// names follow the wire protocol, not Rust convention; `Option` fields are
/// skipped when `None` so that an out-of-range host value is dropped rather
/// than defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundEvent {
    #[serde(rename = "flightPlanDataUpdate")]
    FlightPlanDataUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        controller: Option<String>,
        #[serde(rename = "handoffTargetController", skip_serializing_if = "Option::is_none")]
        handoff_target_controller: Option<String>,
        #[serde(rename = "nextController", skip_serializing_if = "Option::is_none")]
        next_controller: Option<String>,
        #[serde(rename = "aircraftType", skip_serializing_if = "Option::is_none")]
        aircraft_type: Option<String>,
        #[serde(rename = "wakeTurbulence", skip_serializing_if = "Option::is_none")]
        wake_turbulence: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        destination: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        alternate: Option<String>,
        #[serde(rename = "flightRules", skip_serializing_if = "Option::is_none")]
        flight_rules: Option<String>,
        #[serde(rename = "communicationType", skip_serializing_if = "Option::is_none")]
        communication_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        groundstate: Option<String>,
        clearance: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        route: Option<String>,
        #[serde(rename = "arrRwy", skip_serializing_if = "Option::is_none")]
        arr_rwy: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        star: Option<String>,
        #[serde(rename = "depRwy", skip_serializing_if = "Option::is_none")]
        dep_rwy: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sid: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        eobt: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ete: Option<i32>,
    },

    #[serde(rename = "controllerAssignedDataUpdate")]
    ControllerAssignedDataUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        controller: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        squawk: Option<String>,
        /// Requested final level.
        #[serde(skip_serializing_if = "Option::is_none")]
        rfl: Option<i32>,
        /// Cleared level; 1 and 2 are the approach-clearance sentinels.
        #[serde(skip_serializing_if = "Option::is_none")]
        cfl: Option<i32>,
        /// Assigned heading.
        #[serde(skip_serializing_if = "Option::is_none")]
        ahdg: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        direct: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        groundstate: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        clearance: Option<bool>,
        #[serde(rename = "clearedToLand", skip_serializing_if = "Option::is_none")]
        cleared_to_land: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stand: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        scratch: Option<String>,
        /// Assigned speed, knots.
        #[serde(skip_serializing_if = "Option::is_none")]
        asp: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mach: Option<f64>,
        /// Assigned rate of climb/descent, feet per minute.
        #[serde(skip_serializing_if = "Option::is_none")]
        arc: Option<i32>,
    },

    #[serde(rename = "flightPlanDisconnect")]
    FlightPlanDisconnect {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
    },

    #[serde(rename = "flightPlanFlightStripPushed")]
    FlightPlanFlightStripPushed {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },

    #[serde(rename = "controllerPositionUpdate")]
    ControllerPositionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<String>,
        /// Sanitized, always present: display names may carry legacy bytes
        /// but must still reach the peer.
        name: String,
        frequency: f64,
        rating: i32,
        facility: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        sector: Option<String>,
        controller: bool,
        /// Whether this controller is the local operator.
        #[serde(skip_serializing_if = "Option::is_none")]
        me: Option<bool>,
    },

    #[serde(rename = "controllerDisconnect")]
    ControllerDisconnect {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
    },

    #[serde(rename = "radarTargetPositionUpdate")]
    RadarTargetPositionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        #[serde(rename = "verticalSpeed")]
        vertical_speed: i32,
        gs: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        latitude: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        longitude: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        altitude: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        heading: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        squawk: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        controller: Option<String>,
        #[serde(rename = "handoffTargetController", skip_serializing_if = "Option::is_none")]
        handoff_target_controller: Option<String>,
        #[serde(rename = "nextController", skip_serializing_if = "Option::is_none")]
        next_controller: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ete: Option<i32>,
    },

    #[serde(rename = "myselfUpdate")]
    MyselfUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        callsign: Option<String>,
        name: String,
        frequency: f64,
        rating: i32,
        facility: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        sector: Option<String>,
        controller: bool,
        #[serde(rename = "pluginVersion")]
        plugin_version: String,
        rwyconfig: RunwayConfig,
    },

    #[serde(rename = "connectionTypeUpdate")]
    ConnectionTypeUpdate {
        #[serde(rename = "connectionType")]
        connection_type: i32,
    },
}

impl OutboundEvent {
    /// The wire `type` string of this event.
    pub fn type_name(&self) -> &'static str {
        match self {
            OutboundEvent::FlightPlanDataUpdate { .. } => "flightPlanDataUpdate",
            OutboundEvent::ControllerAssignedDataUpdate { .. } => "controllerAssignedDataUpdate",
            OutboundEvent::FlightPlanDisconnect { .. } => "flightPlanDisconnect",
            OutboundEvent::FlightPlanFlightStripPushed { .. } => "flightPlanFlightStripPushed",
            OutboundEvent::ControllerPositionUpdate { .. } => "controllerPositionUpdate",
            OutboundEvent::ControllerDisconnect { .. } => "controllerDisconnect",
            OutboundEvent::RadarTargetPositionUpdate { .. } => "radarTargetPositionUpdate",
            OutboundEvent::MyselfUpdate { .. } => "myselfUpdate",
            OutboundEvent::ConnectionTypeUpdate { .. } => "connectionTypeUpdate",
        }
    }
}
