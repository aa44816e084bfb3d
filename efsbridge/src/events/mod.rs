//! Event normalizer: host state in, filtered and validated wire events out.
//!
//! Each builder takes a snapshot of live host state and produces one
//! [`OutboundEvent`], applying the field-level validation rules: length
//! ceilings, numeric ranges, and the UTF-8 policies from [`crate::encoding`].
//! A field that fails validation is omitted from the event, never defaulted,
//! with two documented sentinel exceptions (cleared altitude 1/2 and the
//! heading/direct-to coupling).

mod myself;
mod scratch;

pub use myself::{runway_config, MAX_AIRPORTS, MAX_RUNWAYS};
pub use scratch::{classify, ScratchClassification};

use thiserror::Error;
use tracing::debug;

use crate::encoding::{is_valid_utf8, sanitize_utf8, to_utf8};
use crate::host::{
    ConnectionType, ControllerSnapshot, FlightPlanSnapshot, HostText, RadarTargetSnapshot,
};
use crate::protocol::{OutboundEvent, RunwayConfig};

/// Maximum callsign length accepted from the host.
const MAX_CALLSIGN_LEN: usize = 20;

/// Longest scratch-pad value the host-side convention uses.
const MAX_SCRATCH_LEN: usize = 50;

/// Why a snapshot could not be normalized into an event.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Callsign empty or over the length ceiling.
    #[error("invalid callsign")]
    InvalidCallsign,

    /// Flight-plan data has not fully arrived from the network yet.
    #[error("flight plan data not received")]
    DataNotReceived,

    /// Assigned-data sub-type code outside the known range.
    #[error("unsupported assigned-data code {0}")]
    UnknownDataCode(i32),

    /// Scratch-pad content over the conventional ceiling.
    #[error("scratch pad string too long")]
    ScratchPadTooLong,
}

impl NormalizeError {
    /// Whether this failure warrants an operator message rather than a
    /// debug note.
    pub fn reportable(&self) -> bool {
        matches!(self, NormalizeError::InvalidCallsign)
    }
}

/// Sub-type codes of the controller-assigned-data update callback.
///
/// Host-defined numbering; exactly one data field is populated per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignedDataCode {
    Squawk,
    FinalAltitude,
    TemporaryAltitude,
    CommunicationType,
    ScratchPad,
    GroundState,
    ClearanceFlag,
    DepartureSequence,
    Speed,
    Mach,
    Rate,
    Heading,
    DirectTo,
}

impl TryFrom<i32> for AssignedDataCode {
    type Error = NormalizeError;

    fn try_from(code: i32) -> Result<Self, NormalizeError> {
        match code {
            1 => Ok(AssignedDataCode::Squawk),
            2 => Ok(AssignedDataCode::FinalAltitude),
            3 => Ok(AssignedDataCode::TemporaryAltitude),
            4 => Ok(AssignedDataCode::CommunicationType),
            5 => Ok(AssignedDataCode::ScratchPad),
            6 => Ok(AssignedDataCode::GroundState),
            7 => Ok(AssignedDataCode::ClearanceFlag),
            8 => Ok(AssignedDataCode::DepartureSequence),
            9 => Ok(AssignedDataCode::Speed),
            10 => Ok(AssignedDataCode::Mach),
            11 => Ok(AssignedDataCode::Rate),
            12 => Ok(AssignedDataCode::Heading),
            13 => Ok(AssignedDataCode::DirectTo),
            _ => Err(NormalizeError::UnknownDataCode(code)),
        }
    }
}

/// Text field under the "omit if invalid" policy.
fn text_if_valid(text: &HostText) -> Option<String> {
    if is_valid_utf8(text.as_bytes()) {
        // The scan just validated the bytes, so this cannot fail.
        std::str::from_utf8(text.as_bytes()).ok().map(str::to_string)
    } else {
        debug!(len = text.len(), "dropping field with invalid UTF-8");
        None
    }
}

/// Text field with a length ceiling (exclusive), empty values still emitted.
fn text_under(text: &HostText, max_len: usize) -> Option<String> {
    if text.len() < max_len {
        text_if_valid(text)
    } else {
        None
    }
}

/// Text field with a length ceiling, empty values omitted.
fn nonempty_text_under(text: &HostText, max_len: usize) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        text_under(text, max_len)
    }
}

/// A squawk or off-block time: exactly four ASCII digits.
fn four_digits(text: &HostText) -> Option<String> {
    let bytes = text.as_bytes();
    if bytes.len() == 4 && bytes.iter().all(u8::is_ascii_digit) {
        text_if_valid(text)
    } else {
        None
    }
}

fn in_range_i32(value: i32, range: std::ops::RangeInclusive<i32>) -> Option<i32> {
    range.contains(&value).then_some(value)
}

/// The validated callsign, or the error that suppresses the whole event.
fn checked_callsign(callsign: &HostText) -> Result<Option<String>, NormalizeError> {
    if callsign.is_empty() || callsign.len() > MAX_CALLSIGN_LEN {
        return Err(NormalizeError::InvalidCallsign);
    }
    Ok(text_if_valid(callsign))
}

/// Country-prefix pre-filter for flight-plan events.
///
/// A plan passes only when it is valid, its data has fully arrived, and
/// either its origin or its destination airport code starts with the
/// configured prefix.
pub fn passes_filter(fp: &FlightPlanSnapshot, prefix: &str) -> bool {
    if !fp.is_valid || !fp.data_received {
        return false;
    }
    let origin = fp.origin.as_bytes();
    let destination = fp.destination.as_bytes();
    if origin.len() < prefix.len() || destination.len() < prefix.len() {
        return false;
    }
    if origin.is_empty() || destination.is_empty() {
        return false;
    }
    origin.starts_with(prefix.as_bytes()) || destination.starts_with(prefix.as_bytes())
}

/// Full flight-plan data event.
pub fn flight_plan_data_update(fp: &FlightPlanSnapshot) -> Result<OutboundEvent, NormalizeError> {
    let callsign = checked_callsign(&fp.callsign)?;
    if !fp.data_received {
        return Err(NormalizeError::DataNotReceived);
    }

    debug!(
        state = fp.state,
        fp_state = fp.fp_state,
        simulated = fp.simulated,
        "flight plan data update"
    );

    Ok(OutboundEvent::FlightPlanDataUpdate {
        callsign,
        controller: text_under(&fp.tracking_controller, MAX_CALLSIGN_LEN),
        handoff_target_controller: text_under(&fp.handoff_target, MAX_CALLSIGN_LEN),
        next_controller: text_under(&fp.next_controller, MAX_CALLSIGN_LEN),
        aircraft_type: nonempty_text_under(&fp.aircraft_type, 20),
        wake_turbulence: fp.wake_turbulence.map(|c| c.to_string()),
        origin: text_under(&fp.origin, 10),
        destination: text_under(&fp.destination, 10),
        alternate: text_under(&fp.alternate, 10),
        flight_rules: text_if_valid(&fp.flight_rules),
        communication_type: fp.communication_type.map(|c| c.to_string()),
        groundstate: text_if_valid(&fp.ground_state),
        clearance: fp.clearance_flag,
        route: (!fp.route.is_empty() && fp.route.len() < 1000)
            .then(|| to_utf8(fp.route.as_bytes())),
        arr_rwy: nonempty_text_under(&fp.arrival_runway, 5),
        star: (!fp.star.is_empty() && fp.star.len() < 10).then(|| to_utf8(fp.star.as_bytes())),
        dep_rwy: nonempty_text_under(&fp.departure_runway, 5),
        sid: (!fp.sid.is_empty() && fp.sid.len() < 10).then(|| to_utf8(fp.sid.as_bytes())),
        eobt: four_digits(&fp.estimated_departure_time),
        ete: in_range_i32(fp.prediction_points, 0..=3600),
    })
}

/// Empty assigned-data event scaffold for one flight plan.
fn assigned_data_base(fp: &FlightPlanSnapshot) -> Result<OutboundEvent, NormalizeError> {
    Ok(OutboundEvent::ControllerAssignedDataUpdate {
        callsign: checked_callsign(&fp.callsign)?,
        controller: nonempty_text_under(&fp.tracking_controller, MAX_CALLSIGN_LEN),
        squawk: None,
        rfl: None,
        cfl: None,
        ahdg: None,
        direct: None,
        groundstate: None,
        clearance: None,
        cleared_to_land: None,
        stand: None,
        scratch: None,
        asp: None,
        mach: None,
        arc: None,
    })
}

/// Controller-assigned-data event: exactly one data field per sub-type code.
pub fn controller_assigned_data_update(
    fp: &FlightPlanSnapshot,
    code: i32,
) -> Result<OutboundEvent, NormalizeError> {
    let data_code = AssignedDataCode::try_from(code)?;
    let mut event = assigned_data_base(fp)?;

    let OutboundEvent::ControllerAssignedDataUpdate {
        squawk,
        rfl,
        cfl,
        ahdg,
        direct,
        groundstate,
        clearance,
        cleared_to_land,
        stand,
        scratch,
        asp,
        mach,
        arc,
        ..
    } = &mut event
    else {
        unreachable!("assigned_data_base builds this variant");
    };

    let assigned = &fp.assigned;
    match data_code {
        AssignedDataCode::Squawk => *squawk = four_digits(&assigned.squawk),
        AssignedDataCode::FinalAltitude => {
            *rfl = in_range_i32(assigned.final_altitude, 0..=100_000);
        }
        AssignedDataCode::TemporaryAltitude => {
            // 0 means "no cleared level, use the final"; 1 and 2 are the
            // ILS/visual approach clearances and suppress lateral guidance.
            *cfl = Some(assigned.cleared_altitude);
            if assigned.cleared_altitude == 1 || assigned.cleared_altitude == 2 {
                *ahdg = Some(0);
                *direct = Some(String::new());
            }
        }
        AssignedDataCode::CommunicationType => {
            debug!(comm = ?assigned.communication_type, "communication type change");
        }
        AssignedDataCode::ScratchPad => {
            if assigned.scratch_pad.len() > MAX_SCRATCH_LEN {
                return Err(NormalizeError::ScratchPadTooLong);
            }
            match text_if_valid(&assigned.scratch_pad) {
                Some(value) => match classify(&value) {
                    ScratchClassification::GroundState(state) => *groundstate = Some(state),
                    ScratchClassification::ClearedToLand => *cleared_to_land = Some(true),
                    ScratchClassification::Stand(name) => *stand = Some(name),
                    ScratchClassification::Scratch(text) => *scratch = Some(text),
                },
                None => debug!("scratch pad dropped: invalid UTF-8"),
            }
        }
        AssignedDataCode::GroundState => *groundstate = text_if_valid(&fp.ground_state),
        AssignedDataCode::ClearanceFlag => *clearance = Some(fp.clearance_flag),
        AssignedDataCode::DepartureSequence => {
            // The host never exposes the sequence value; placeholder kept so
            // the code is acknowledged rather than reported as unknown.
        }
        AssignedDataCode::Speed => *asp = in_range_i32(assigned.assigned_speed, 0..=1500),
        AssignedDataCode::Mach => {
            if (0.0..=10.0).contains(&assigned.assigned_mach) {
                *mach = Some(assigned.assigned_mach);
            }
        }
        AssignedDataCode::Rate => *arc = in_range_i32(assigned.assigned_rate, -50_000..=50_000),
        AssignedDataCode::Heading => {
            if let Some(heading) = in_range_i32(assigned.assigned_heading, 0..=360) {
                *ahdg = Some(heading);
                *direct = Some(String::new());
            }
        }
        AssignedDataCode::DirectTo => {
            if assigned.direct_to.len() < 50 {
                *direct = text_if_valid(&assigned.direct_to);
                if !assigned.direct_to.is_empty() {
                    *ahdg = Some(0);
                }
            }
        }
    }

    Ok(event)
}

/// Assigned-data summary carrying every in-range field at once.
///
/// Used by the full-state refresh, where no single sub-type applies. The
/// scratch pad travels verbatim here; classification only applies to live
/// scratch-pad change events.
pub fn assigned_data_summary(fp: &FlightPlanSnapshot) -> Result<OutboundEvent, NormalizeError> {
    let mut event = assigned_data_base(fp)?;

    let OutboundEvent::ControllerAssignedDataUpdate {
        squawk,
        rfl,
        cfl,
        ahdg,
        direct,
        groundstate,
        clearance,
        scratch,
        asp,
        mach,
        arc,
        ..
    } = &mut event
    else {
        unreachable!("assigned_data_base builds this variant");
    };

    let assigned = &fp.assigned;
    *squawk = four_digits(&assigned.squawk);
    *rfl = in_range_i32(assigned.final_altitude, 0..=100_000);
    *cfl = Some(assigned.cleared_altitude);
    if assigned.cleared_altitude == 1 || assigned.cleared_altitude == 2 {
        *ahdg = Some(0);
        *direct = Some(String::new());
    }
    *scratch = text_if_valid(&assigned.scratch_pad);
    *groundstate = text_if_valid(&fp.ground_state);
    *clearance = Some(fp.clearance_flag);
    *asp = in_range_i32(assigned.assigned_speed, 0..=1500);
    if (0.0..=10.0).contains(&assigned.assigned_mach) {
        *mach = Some(assigned.assigned_mach);
    }
    *arc = in_range_i32(assigned.assigned_rate, -50_000..=50_000);
    if let Some(heading) = in_range_i32(assigned.assigned_heading, 0..=360) {
        *ahdg = Some(heading);
        *direct = Some(String::new());
    }
    if assigned.direct_to.len() < 50 {
        if let Some(point) = text_if_valid(&assigned.direct_to) {
            if !point.is_empty() {
                *ahdg = Some(0);
            }
            *direct = Some(point);
        }
    }

    Ok(event)
}

/// Flight-plan disconnect notification.
pub fn flight_plan_disconnect(fp: &FlightPlanSnapshot) -> OutboundEvent {
    OutboundEvent::FlightPlanDisconnect {
        callsign: text_if_valid(&fp.callsign),
    }
}

/// Flight-strip push notification.
pub fn flight_strip_pushed(
    fp: &FlightPlanSnapshot,
    sender: &HostText,
    target: &HostText,
) -> OutboundEvent {
    OutboundEvent::FlightPlanFlightStripPushed {
        callsign: text_if_valid(&fp.callsign),
        sender: nonempty_text_under(sender, MAX_CALLSIGN_LEN),
        target: nonempty_text_under(target, MAX_CALLSIGN_LEN),
    }
}

/// Controller position event. `self_callsign` is the local operator's own
/// callsign, used to compute the `me` flag.
pub fn controller_position_update(
    controller: &ControllerSnapshot,
    self_callsign: Option<&str>,
) -> OutboundEvent {
    let callsign = text_if_valid(&controller.callsign);
    let me = match (&callsign, self_callsign) {
        (Some(callsign), Some(own)) => Some(callsign == own),
        _ => None,
    };
    OutboundEvent::ControllerPositionUpdate {
        callsign,
        position: text_if_valid(&controller.position_id),
        name: sanitize_utf8(controller.full_name.as_bytes()),
        frequency: controller.primary_frequency,
        rating: controller.rating,
        facility: controller.facility,
        sector: text_if_valid(&controller.sector_file_name),
        controller: controller.is_controller,
        me,
    }
}

/// Controller disconnect notification.
pub fn controller_disconnect(controller: &ControllerSnapshot) -> OutboundEvent {
    OutboundEvent::ControllerDisconnect {
        callsign: text_if_valid(&controller.callsign),
    }
}

/// Radar-track position event; `None` when the track is not valid.
pub fn radar_target_position_update(target: &RadarTargetSnapshot) -> Option<OutboundEvent> {
    if !target.is_valid {
        return None;
    }

    let mut event = OutboundEvent::RadarTargetPositionUpdate {
        callsign: text_if_valid(&target.callsign),
        vertical_speed: target.vertical_speed,
        gs: target.ground_speed,
        latitude: None,
        longitude: None,
        altitude: None,
        heading: None,
        squawk: None,
        controller: None,
        handoff_target_controller: None,
        next_controller: None,
        ete: None,
    };

    let OutboundEvent::RadarTargetPositionUpdate {
        latitude,
        longitude,
        altitude,
        heading,
        squawk,
        controller,
        handoff_target_controller,
        next_controller,
        ete,
        ..
    } = &mut event
    else {
        unreachable!("constructed above");
    };

    if let Some(position) = &target.position {
        *latitude = Some(position.latitude);
        *longitude = Some(position.longitude);
        *altitude = Some(position.pressure_altitude);
        *heading = Some(position.heading_true);
        *squawk = four_digits(&position.squawk);
    }

    if let Some(plan) = &target.correlated_plan {
        *controller = text_under(&plan.tracking_controller, MAX_CALLSIGN_LEN);
        *handoff_target_controller = text_under(&plan.handoff_target, MAX_CALLSIGN_LEN);
        *next_controller = text_under(&plan.next_controller, MAX_CALLSIGN_LEN);
        *ete = in_range_i32(plan.prediction_points, 0..=3600);
    }

    Some(event)
}

/// Self-state event with the active runway configuration.
pub fn myself_update(
    me: &ControllerSnapshot,
    rwyconfig: RunwayConfig,
    version: &str,
) -> Result<OutboundEvent, NormalizeError> {
    let callsign = checked_callsign(&me.callsign)?;
    Ok(OutboundEvent::MyselfUpdate {
        callsign,
        name: sanitize_utf8(me.full_name.as_bytes()),
        frequency: me.primary_frequency,
        rating: me.rating,
        facility: me.facility,
        sector: text_if_valid(&me.sector_file_name),
        controller: me.is_controller,
        plugin_version: version.to_string(),
        rwyconfig,
    })
}

/// Lifecycle transition notification.
pub fn connection_type_update(connection_type: ConnectionType) -> OutboundEvent {
    OutboundEvent::ConnectionTypeUpdate {
        connection_type: connection_type.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::AssignedData;

    fn plan(callsign: &str, origin: &str, destination: &str) -> FlightPlanSnapshot {
        FlightPlanSnapshot {
            callsign: HostText::from(callsign),
            is_valid: true,
            data_received: true,
            origin: HostText::from(origin),
            destination: HostText::from(destination),
            ..FlightPlanSnapshot::default()
        }
    }

    #[test]
    fn filter_requires_prefix_on_either_end() {
        assert!(passes_filter(&plan("SAS123", "ESSA", "EKCH"), "ES"));
        assert!(passes_filter(&plan("SAS123", "EKCH", "ESGG"), "ES"));
        assert!(!passes_filter(&plan("DLH4AB", "EDDF", "EKCH"), "ES"));
    }

    #[test]
    fn filter_rejects_invalid_or_unreceived_plans() {
        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.is_valid = false;
        assert!(!passes_filter(&fp, "ES"));

        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.data_received = false;
        assert!(!passes_filter(&fp, "ES"));
    }

    #[test]
    fn filter_rejects_short_airport_codes() {
        assert!(!passes_filter(&plan("SAS123", "E", "E"), "ES"));
        assert!(!passes_filter(&plan("SAS123", "", "ESSA"), "ES"));
    }

    #[test]
    fn filter_prefix_is_configurable() {
        assert!(passes_filter(&plan("DLH4AB", "EDDF", "EKCH"), "ED"));
        assert!(!passes_filter(&plan("SAS123", "ESSA", "ESGG"), "ED"));
    }

    #[test]
    fn data_update_rejects_bad_callsigns() {
        let fp = plan("", "ESSA", "EKCH");
        assert!(matches!(
            flight_plan_data_update(&fp),
            Err(NormalizeError::InvalidCallsign)
        ));

        let fp = plan("THISCALLSIGNISTOOLONGX", "ESSA", "EKCH");
        assert!(matches!(
            flight_plan_data_update(&fp),
            Err(NormalizeError::InvalidCallsign)
        ));
    }

    #[test]
    fn data_update_emits_in_range_fields_and_drops_the_rest() {
        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.estimated_departure_time = HostText::from("0815");
        fp.prediction_points = 3600; // boundary value is included
        fp.route = HostText::from("N0450F350 ESOW");
        fp.arrival_runway = HostText::from("19LONG"); // over the <5 ceiling

        let event = flight_plan_data_update(&fp).unwrap();
        let OutboundEvent::FlightPlanDataUpdate {
            callsign,
            eobt,
            ete,
            route,
            arr_rwy,
            ..
        } = event
        else {
            panic!("wrong variant");
        };
        assert_eq!(callsign.as_deref(), Some("SAS123"));
        assert_eq!(eobt.as_deref(), Some("0815"));
        assert_eq!(ete, Some(3600));
        assert_eq!(route.as_deref(), Some("N0450F350 ESOW"));
        assert_eq!(arr_rwy, None);
    }

    #[test]
    fn data_update_drops_out_of_range_ete_and_non_digit_eobt() {
        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.estimated_departure_time = HostText::from("8:15");
        fp.prediction_points = 3601;

        let event = flight_plan_data_update(&fp).unwrap();
        let OutboundEvent::FlightPlanDataUpdate { eobt, ete, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(eobt, None);
        assert_eq!(ete, None);
    }

    #[test]
    fn data_update_converts_legacy_route_text() {
        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.route = HostText::new(vec![b'A', 0xB7, b'B']); // middle dot in CP-1252
        let event = flight_plan_data_update(&fp).unwrap();
        let OutboundEvent::FlightPlanDataUpdate { route, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(route.as_deref(), Some("A\u{B7}B"));
    }

    fn assigned_plan(assigned: AssignedData) -> FlightPlanSnapshot {
        let mut fp = plan("SAS123", "ESSA", "EKCH");
        fp.assigned = assigned;
        fp
    }

    #[test]
    fn unknown_data_code_is_dropped() {
        let fp = assigned_plan(AssignedData::default());
        assert!(matches!(
            controller_assigned_data_update(&fp, 0),
            Err(NormalizeError::UnknownDataCode(0))
        ));
        assert!(matches!(
            controller_assigned_data_update(&fp, 14),
            Err(NormalizeError::UnknownDataCode(14))
        ));
    }

    #[test]
    fn cleared_altitude_sentinels_emit_approach_clearance_pair() {
        for sentinel in [1, 2] {
            let fp = assigned_plan(AssignedData {
                cleared_altitude: sentinel,
                ..AssignedData::default()
            });
            let event = controller_assigned_data_update(&fp, 3).unwrap();
            let OutboundEvent::ControllerAssignedDataUpdate { cfl, ahdg, direct, .. } = event
            else {
                panic!("wrong variant");
            };
            assert_eq!(cfl, Some(sentinel));
            assert_eq!(ahdg, Some(0));
            assert_eq!(direct.as_deref(), Some(""));
        }
    }

    #[test]
    fn ordinary_cleared_altitude_has_no_sentinel_pair() {
        let fp = assigned_plan(AssignedData {
            cleared_altitude: 5000,
            ..AssignedData::default()
        });
        let event = controller_assigned_data_update(&fp, 3).unwrap();
        let OutboundEvent::ControllerAssignedDataUpdate { cfl, ahdg, direct, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(cfl, Some(5000));
        assert_eq!(ahdg, None);
        assert_eq!(direct, None);
    }

    #[test]
    fn numeric_ranges_include_boundaries_and_drop_outliers() {
        // Speed boundary values are kept.
        for (speed, expected) in [(0, Some(0)), (1500, Some(1500)), (1501, None), (-1, None)] {
            let fp = assigned_plan(AssignedData {
                assigned_speed: speed,
                ..AssignedData::default()
            });
            let event = controller_assigned_data_update(&fp, 9).unwrap();
            let OutboundEvent::ControllerAssignedDataUpdate { asp, .. } = event else {
                panic!("wrong variant");
            };
            assert_eq!(asp, expected, "speed {speed}");
        }

        for (value, expected) in [(0.0, Some(0.0)), (10.0, Some(10.0)), (10.5, None)] {
            let fp = assigned_plan(AssignedData {
                assigned_mach: value,
                ..AssignedData::default()
            });
            let event = controller_assigned_data_update(&fp, 10).unwrap();
            let OutboundEvent::ControllerAssignedDataUpdate { mach, .. } = event else {
                panic!("wrong variant");
            };
            assert_eq!(mach, expected, "mach {value}");
        }

        for (heading, expected) in [(0, Some(0)), (360, Some(360)), (361, None)] {
            let fp = assigned_plan(AssignedData {
                assigned_heading: heading,
                ..AssignedData::default()
            });
            let event = controller_assigned_data_update(&fp, 12).unwrap();
            let OutboundEvent::ControllerAssignedDataUpdate { ahdg, .. } = event else {
                panic!("wrong variant");
            };
            assert_eq!(ahdg, expected, "heading {heading}");
        }
    }

    #[test]
    fn in_range_heading_clears_direct_to() {
        let fp = assigned_plan(AssignedData {
            assigned_heading: 270,
            ..AssignedData::default()
        });
        let event = controller_assigned_data_update(&fp, 12).unwrap();
        let OutboundEvent::ControllerAssignedDataUpdate { ahdg, direct, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(ahdg, Some(270));
        assert_eq!(direct.as_deref(), Some(""));
    }

    #[test]
    fn direct_to_clears_heading() {
        let fp = assigned_plan(AssignedData {
            direct_to: HostText::from("ERNOV"),
            ..AssignedData::default()
        });
        let event = controller_assigned_data_update(&fp, 13).unwrap();
        let OutboundEvent::ControllerAssignedDataUpdate { ahdg, direct, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(direct.as_deref(), Some("ERNOV"));
        assert_eq!(ahdg, Some(0));
    }

    #[test]
    fn scratch_pad_change_is_classified() {
        let cases: [(&str, fn(&OutboundEvent)); 4] = [
            ("LINEUP", |e: &OutboundEvent| {
                let OutboundEvent::ControllerAssignedDataUpdate { groundstate, .. } = e else {
                    panic!();
                };
                assert_eq!(groundstate.as_deref(), Some("LINEUP"));
            }),
            ("GRP/S/A1", |e: &OutboundEvent| {
                let OutboundEvent::ControllerAssignedDataUpdate { stand, .. } = e else {
                    panic!();
                };
                assert_eq!(stand.as_deref(), Some("A1"));
            }),
            ("/EFS/CTL", |e: &OutboundEvent| {
                let OutboundEvent::ControllerAssignedDataUpdate { cleared_to_land, .. } = e
                else {
                    panic!();
                };
                assert_eq!(*cleared_to_land, Some(true));
            }),
            ("FOO", |e: &OutboundEvent| {
                let OutboundEvent::ControllerAssignedDataUpdate { scratch, .. } = e else {
                    panic!();
                };
                assert_eq!(scratch.as_deref(), Some("FOO"));
            }),
        ];
        for (pad, check) in cases {
            let fp = assigned_plan(AssignedData {
                scratch_pad: HostText::from(pad),
                ..AssignedData::default()
            });
            let event = controller_assigned_data_update(&fp, 5).unwrap();
            check(&event);
        }
    }

    #[test]
    fn oversized_scratch_pad_suppresses_the_event() {
        let fp = assigned_plan(AssignedData {
            scratch_pad: HostText::from("X".repeat(51).as_str()),
            ..AssignedData::default()
        });
        assert!(matches!(
            controller_assigned_data_update(&fp, 5),
            Err(NormalizeError::ScratchPadTooLong)
        ));
    }

    #[test]
    fn summary_carries_all_in_range_fields() {
        let mut fp = assigned_plan(AssignedData {
            squawk: HostText::from("2345"),
            final_altitude: 35000,
            cleared_altitude: 5000,
            assigned_speed: 250,
            assigned_mach: 0.78,
            assigned_rate: -2000,
            assigned_heading: 180,
            scratch_pad: HostText::from("GRP/S/A1"),
            ..AssignedData::default()
        });
        fp.clearance_flag = true;

        let event = assigned_data_summary(&fp).unwrap();
        let OutboundEvent::ControllerAssignedDataUpdate {
            squawk,
            rfl,
            cfl,
            asp,
            mach,
            arc,
            ahdg,
            direct,
            scratch,
            clearance,
            stand,
            ..
        } = event
        else {
            panic!("wrong variant");
        };
        assert_eq!(squawk.as_deref(), Some("2345"));
        assert_eq!(rfl, Some(35000));
        assert_eq!(cfl, Some(5000));
        assert_eq!(asp, Some(250));
        assert_eq!(mach, Some(0.78));
        assert_eq!(arc, Some(-2000));
        assert_eq!(ahdg, Some(180));
        assert_eq!(direct.as_deref(), Some(""));
        // Refresh sends the raw pad, not its classification.
        assert_eq!(scratch.as_deref(), Some("GRP/S/A1"));
        assert_eq!(stand, None);
        assert_eq!(clearance, Some(true));
    }

    #[test]
    fn radar_event_requires_a_valid_track() {
        let target = RadarTargetSnapshot {
            callsign: HostText::from("SAS123"),
            is_valid: false,
            ..RadarTargetSnapshot::default()
        };
        assert!(radar_target_position_update(&target).is_none());
    }

    #[test]
    fn radar_event_includes_position_and_correlated_plan() {
        use crate::host::RadarPosition;

        let target = RadarTargetSnapshot {
            callsign: HostText::from("SAS123"),
            is_valid: true,
            vertical_speed: -500,
            ground_speed: 240,
            position: Some(RadarPosition {
                latitude: 59.65,
                longitude: 17.92,
                pressure_altitude: 4000,
                heading_true: 185,
                squawk: HostText::from("2345"),
            }),
            correlated_plan: Some(Box::new(FlightPlanSnapshot {
                tracking_controller: HostText::from("ESSA_APP"),
                prediction_points: 42,
                ..FlightPlanSnapshot::default()
            })),
        };

        let event = radar_target_position_update(&target).unwrap();
        let OutboundEvent::RadarTargetPositionUpdate {
            callsign,
            vertical_speed,
            gs,
            latitude,
            squawk,
            controller,
            ete,
            ..
        } = event
        else {
            panic!("wrong variant");
        };
        assert_eq!(callsign.as_deref(), Some("SAS123"));
        assert_eq!(vertical_speed, -500);
        assert_eq!(gs, 240);
        assert_eq!(latitude, Some(59.65));
        assert_eq!(squawk.as_deref(), Some("2345"));
        assert_eq!(controller.as_deref(), Some("ESSA_APP"));
        assert_eq!(ete, Some(42));
    }

    #[test]
    fn controller_event_sanitizes_display_name() {
        let controller = ControllerSnapshot {
            callsign: HostText::from("ESSA_TWR"),
            full_name: HostText::new(vec![b'A', 0xFF, b'B']),
            ..ControllerSnapshot::default()
        };
        let event = controller_position_update(&controller, Some("ESSA_TWR"));
        let OutboundEvent::ControllerPositionUpdate { name, me, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(name, "A?B");
        assert_eq!(me, Some(true));
    }

    #[test]
    fn controller_event_me_flag_false_for_others() {
        let controller = ControllerSnapshot {
            callsign: HostText::from("ESSA_TWR"),
            ..ControllerSnapshot::default()
        };
        let event = controller_position_update(&controller, Some("ESGG_APP"));
        let OutboundEvent::ControllerPositionUpdate { me, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(me, Some(false));
    }

    #[test]
    fn myself_update_carries_version_and_runway_config() {
        let me = ControllerSnapshot {
            callsign: HostText::from("ESSA_TWR"),
            is_controller: true,
            ..ControllerSnapshot::default()
        };
        let event = myself_update(&me, RunwayConfig::new(), "0.3.0").unwrap();
        let OutboundEvent::MyselfUpdate { plugin_version, controller, .. } = event else {
            panic!("wrong variant");
        };
        assert_eq!(plugin_version, "0.3.0");
        assert!(controller);
    }
}
