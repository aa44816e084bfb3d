//! In-memory host implementation for tests and the development peer.
//!
//! Records every mutation and operator message so tests can assert on the
//! exact sequence of host interactions. Query results are served from plain
//! collections the test populates up front.

use std::collections::BTreeMap;

use super::{
    AirportElement, ConnectionType, ControllerSnapshot, FlightPlanSnapshot, Host, HostText,
    RadarTargetSnapshot, RunwayElement, TagDelegate,
};

/// A recorded tracking-state mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingAction {
    Start(String),
    End(String),
    AcceptHandoff(String),
    InitiateHandoff { callsign: String, to: String },
}

/// Recording in-memory [`Host`].
///
/// Mutations are applied to the stored snapshots (so a follow-up query sees
/// the new state) and appended to the corresponding log. Set
/// `reject_mutations` to make every mutate call report failure.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub connection_type: ConnectionType,
    pub myself: Option<ControllerSnapshot>,
    pub plans: BTreeMap<String, FlightPlanSnapshot>,
    pub targets: Vec<RadarTargetSnapshot>,
    pub controllers: Vec<ControllerSnapshot>,
    pub airports: Vec<AirportElement>,
    pub runways: Vec<RunwayElement>,

    pub messages: Vec<String>,
    pub tracking_log: Vec<TrackingAction>,
    pub scratch_writes: Vec<(String, Vec<u8>)>,
    pub route_writes: Vec<(String, Vec<u8>)>,
    pub amended: Vec<String>,
    pub heading_writes: Vec<(String, i32)>,
    pub altitude_writes: Vec<(String, i32)>,

    pub reject_mutations: bool,
}

impl FakeHost {
    /// A host that reports the given session type.
    pub fn with_connection(connection_type: ConnectionType) -> Self {
        Self {
            connection_type,
            ..Self::default()
        }
    }

    /// Store a flight plan, keyed by its callsign.
    pub fn insert_plan(&mut self, plan: FlightPlanSnapshot) {
        let key = String::from_utf8_lossy(plan.callsign.as_bytes()).into_owned();
        self.plans.insert(key, plan);
    }

    /// The local operator's callsign, or empty when not logged in.
    fn my_callsign(&self) -> String {
        self.myself
            .as_ref()
            .map(|me| String::from_utf8_lossy(me.callsign.as_bytes()).into_owned())
            .unwrap_or_default()
    }
}

impl Host for FakeHost {
    fn connection_type(&self) -> ConnectionType {
        self.connection_type
    }

    fn myself(&self) -> Option<ControllerSnapshot> {
        self.myself.clone()
    }

    fn find_flight_plan(&self, callsign: &str) -> Option<FlightPlanSnapshot> {
        self.plans.get(callsign).cloned()
    }

    fn flight_plans(&self) -> Vec<FlightPlanSnapshot> {
        self.plans.values().cloned().collect()
    }

    fn radar_targets(&self) -> Vec<RadarTargetSnapshot> {
        self.targets.clone()
    }

    fn controllers(&self) -> Vec<ControllerSnapshot> {
        self.controllers.clone()
    }

    fn sector_airports(&self) -> Vec<AirportElement> {
        self.airports.clone()
    }

    fn sector_runways(&self) -> Vec<RunwayElement> {
        self.runways.clone()
    }

    fn display_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn start_tracking(&mut self, callsign: &str) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        let me = self.my_callsign();
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.tracking_controller = HostText::from(me.as_str());
        }
        self.tracking_log.push(TrackingAction::Start(callsign.to_string()));
        true
    }

    fn end_tracking(&mut self, callsign: &str) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.tracking_controller = HostText::default();
        }
        self.tracking_log.push(TrackingAction::End(callsign.to_string()));
        true
    }

    fn accept_handoff(&mut self, callsign: &str) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        let me = self.my_callsign();
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.tracking_controller = HostText::from(me.as_str());
            plan.handoff_target = HostText::default();
        }
        self.tracking_log
            .push(TrackingAction::AcceptHandoff(callsign.to_string()));
        true
    }

    fn initiate_handoff(&mut self, callsign: &str, to_controller: &str) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.handoff_target = HostText::from(to_controller);
        }
        self.tracking_log.push(TrackingAction::InitiateHandoff {
            callsign: callsign.to_string(),
            to: to_controller.to_string(),
        });
        true
    }

    fn set_scratch_pad(&mut self, callsign: &str, content: &[u8]) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.assigned.scratch_pad = HostText::new(content);
        }
        self.scratch_writes
            .push((callsign.to_string(), content.to_vec()));
        true
    }

    fn set_route(&mut self, callsign: &str, route: &[u8]) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.route = HostText::new(route);
        }
        self.route_writes.push((callsign.to_string(), route.to_vec()));
        true
    }

    fn amend_flight_plan(&mut self, callsign: &str) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        self.amended.push(callsign.to_string());
        true
    }

    fn set_assigned_heading(&mut self, callsign: &str, heading: i32) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.assigned.assigned_heading = heading;
        }
        self.heading_writes.push((callsign.to_string(), heading));
        true
    }

    fn set_cleared_altitude(&mut self, callsign: &str, altitude: i32) -> bool {
        if self.reject_mutations || !self.plans.contains_key(callsign) {
            return false;
        }
        if let Some(plan) = self.plans.get_mut(callsign) {
            plan.assigned.cleared_altitude = altitude;
        }
        self.altitude_writes.push((callsign.to_string(), altitude));
        true
    }
}

/// Recorded tag-function calls, shared between a [`FakeTagDelegate`] and the
/// test that registered it.
#[derive(Debug, Default)]
pub struct TagCalls {
    pub squawk: Vec<String>,
    pub clearance: Vec<String>,
}

/// Recording [`TagDelegate`] for tests.
///
/// Clones share the same call log, so a test can keep one handle while the
/// bridge owns the other.
#[derive(Debug, Default, Clone)]
pub struct FakeTagDelegate {
    calls: std::rc::Rc<std::cell::RefCell<TagCalls>>,
}

impl FakeTagDelegate {
    pub fn calls(&self) -> std::cell::Ref<'_, TagCalls> {
        self.calls.borrow()
    }
}

impl TagDelegate for FakeTagDelegate {
    fn allocate_squawk(&mut self, callsign: &str) {
        self.calls.borrow_mut().squawk.push(callsign.to_string());
    }

    fn toggle_clearance_flag(&mut self, callsign: &str) {
        self.calls.borrow_mut().clearance.push(callsign.to_string());
    }
}
