//! Capability interface onto the simulation host.
//!
//! The host exposes a deep callback/object model; the bridge never depends on
//! that structure directly. Instead it consumes the narrow [`Host`] trait:
//! query operations return snapshot value types rebuilt fresh from the live
//! model on every call, and mutate operations are keyed by callsign. This is
//! our own surface, decoupled from any particular host SDK, which makes the
//! whole core unit-testable against [`fake::FakeHost`].

pub mod fake;

/// Session connection type reported by the host.
///
/// The numeric codes are the host's own and travel unchanged in the
/// `connectionTypeUpdate` wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionType {
    #[default]
    None,
    Direct,
    ViaProxy,
    SimulatorServer,
    Playback,
    SimulatorClient,
    Sweatbox,
}

impl ConnectionType {
    /// The host's integer code for this connection type.
    pub fn code(self) -> i32 {
        match self {
            ConnectionType::None => 0,
            ConnectionType::Direct => 1,
            ConnectionType::ViaProxy => 2,
            ConnectionType::SimulatorServer => 3,
            ConnectionType::Playback => 4,
            ConnectionType::SimulatorClient => 5,
            ConnectionType::Sweatbox => 6,
        }
    }

    /// Whether this session type carries live (or played-back) traffic.
    ///
    /// The bridge is enabled exactly while this holds.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            ConnectionType::Direct | ConnectionType::Sweatbox | ConnectionType::Playback
        )
    }
}

/// Raw text handed out by the host.
///
/// Host text may be legacy code-page encoded; it crosses the
/// [`crate::encoding`] boundary before appearing in any wire message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostText(Vec<u8>);

impl HostText {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for HostText {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for HostText {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

/// Controller-assigned clearance data attached to a flight plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignedData {
    pub squawk: HostText,
    pub final_altitude: i32,
    /// Cleared altitude. 0 means "use the final level"; 1 and 2 are the
    /// ILS/visual approach-clearance sentinels, not altitudes.
    pub cleared_altitude: i32,
    pub communication_type: Option<char>,
    pub scratch_pad: HostText,
    pub assigned_speed: i32,
    pub assigned_mach: f64,
    pub assigned_rate: i32,
    pub assigned_heading: i32,
    pub direct_to: HostText,
}

/// Live flight-plan state, rebuilt from the host model per event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPlanSnapshot {
    pub callsign: HostText,
    pub is_valid: bool,
    /// Whether the full flight-plan data has arrived from the network.
    pub data_received: bool,
    pub simulated: bool,
    pub state: i32,
    pub fp_state: i32,
    pub tracking_controller: HostText,
    pub handoff_target: HostText,
    pub next_controller: HostText,
    pub aircraft_type: HostText,
    pub wake_turbulence: Option<char>,
    pub origin: HostText,
    pub destination: HostText,
    pub alternate: HostText,
    pub flight_rules: HostText,
    pub communication_type: Option<char>,
    pub ground_state: HostText,
    pub clearance_flag: bool,
    pub route: HostText,
    pub arrival_runway: HostText,
    pub star: HostText,
    pub departure_runway: HostText,
    pub sid: HostText,
    /// Estimated off-block time; valid values are exactly four digits.
    pub estimated_departure_time: HostText,
    /// Position-prediction point count, doubling as estimated time en route.
    pub prediction_points: i32,
    pub assigned: AssignedData,
}

/// Controller position state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub callsign: HostText,
    pub full_name: HostText,
    pub position_id: HostText,
    pub primary_frequency: f64,
    pub rating: i32,
    pub facility: i32,
    pub sector_file_name: HostText,
    pub is_controller: bool,
}

/// A radar-reported position fix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub pressure_altitude: i32,
    /// Reported heading relative to true north.
    pub heading_true: i32,
    pub squawk: HostText,
}

/// Radar-track state, with the correlated flight plan when one exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarTargetSnapshot {
    pub callsign: HostText,
    pub is_valid: bool,
    pub vertical_speed: i32,
    pub ground_speed: i32,
    pub position: Option<RadarPosition>,
    pub correlated_plan: Option<Box<FlightPlanSnapshot>>,
}

/// One sector-file airport element with its active-state flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportElement {
    pub name: HostText,
    pub arrival_active: bool,
    pub departure_active: bool,
}

/// One runway end of a sector-file runway element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunwayEnd {
    pub name: HostText,
    pub arrival_active: bool,
    pub departure_active: bool,
}

/// One sector-file runway element (two ends).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunwayElement {
    pub airport: HostText,
    pub ends: [Option<RunwayEnd>; 2],
}

/// Query and mutate capabilities the bridge consumes from the host.
///
/// Implemented by the host adapter in production and by
/// [`fake::FakeHost`] in tests. Mutations return `false` when the host
/// rejects them; the bridge reports such failures and never retries.
pub trait Host {
    fn connection_type(&self) -> ConnectionType;

    /// The local operator's own controller record, if logged in.
    fn myself(&self) -> Option<ControllerSnapshot>;

    /// Look up a flight plan by exact (already uppercased) callsign.
    fn find_flight_plan(&self, callsign: &str) -> Option<FlightPlanSnapshot>;

    fn flight_plans(&self) -> Vec<FlightPlanSnapshot>;
    fn radar_targets(&self) -> Vec<RadarTargetSnapshot>;
    fn controllers(&self) -> Vec<ControllerSnapshot>;

    fn sector_airports(&self) -> Vec<AirportElement>;
    fn sector_runways(&self) -> Vec<RunwayElement>;

    /// Show a one-line message to the operator.
    fn display_message(&mut self, text: &str);

    fn start_tracking(&mut self, callsign: &str) -> bool;
    fn end_tracking(&mut self, callsign: &str) -> bool;
    fn accept_handoff(&mut self, callsign: &str) -> bool;
    fn initiate_handoff(&mut self, callsign: &str, to_controller: &str) -> bool;

    /// Write the scratch pad. `content` is legacy-encoded host text.
    fn set_scratch_pad(&mut self, callsign: &str, content: &[u8]) -> bool;

    /// Replace the route string. `route` is legacy-encoded host text.
    fn set_route(&mut self, callsign: &str, route: &[u8]) -> bool;

    /// Re-amend the flight plan after a route change (host-side validation
    /// and recompute step).
    fn amend_flight_plan(&mut self, callsign: &str) -> bool;

    fn set_assigned_heading(&mut self, callsign: &str, heading: i32) -> bool;
    fn set_cleared_altitude(&mut self, callsign: &str, altitude: i32) -> bool;
}

/// Optional drawing-surface capability.
///
/// Squawk reallocation and the clearance-flag toggle can only be expressed as
/// host tag functions, which require a registered drawing delegate. When the
/// operator has not enabled the drawing surface, these commands are refused
/// with an instruction rather than treated as a bug.
pub trait TagDelegate {
    fn allocate_squawk(&mut self, callsign: &str);
    fn toggle_clearance_flag(&mut self, callsign: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_connection_types() {
        assert!(ConnectionType::Direct.is_live());
        assert!(ConnectionType::Sweatbox.is_live());
        assert!(ConnectionType::Playback.is_live());
        assert!(!ConnectionType::None.is_live());
        assert!(!ConnectionType::ViaProxy.is_live());
        assert!(!ConnectionType::SimulatorServer.is_live());
        assert!(!ConnectionType::SimulatorClient.is_live());
    }

    #[test]
    fn connection_type_codes_are_stable() {
        // Wire-visible values; the external peer matches on them.
        assert_eq!(ConnectionType::None.code(), 0);
        assert_eq!(ConnectionType::Direct.code(), 1);
        assert_eq!(ConnectionType::Playback.code(), 4);
        assert_eq!(ConnectionType::Sweatbox.code(), 6);
    }

    #[test]
    fn host_text_basics() {
        let t = HostText::from("SAS123");
        assert_eq!(t.as_bytes(), b"SAS123");
        assert_eq!(t.len(), 6);
        assert!(!t.is_empty());
        assert!(HostText::default().is_empty());
    }
}
