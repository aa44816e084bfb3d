//! Command translation: inbound wire commands to host mutations.
//!
//! [`execute`] is the single dispatch point for all inbound commands; the
//! text-command surface reuses the same primitives. Every host mutation goes
//! through the [`Host`] trait, so the whole translator is testable against
//! [`crate::host::fake::FakeHost`].

pub mod route;

use thiserror::Error;

use crate::encoding::{to_legacy, to_utf8};
use crate::host::{Host, TagDelegate};
use crate::protocol::InboundCommand;

/// Command failure, shown to the operator verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{context}: Empty callsign")]
    EmptyCallsign { context: &'static str },

    #[error("setGroundState: Invalid callsign or state")]
    InvalidGroundState,

    #[error("{context}: Flight plan not found: {callsign}")]
    FlightPlanNotFound {
        context: &'static str,
        callsign: String,
    },

    /// The host refused a mutation; the message names the operation.
    #[error("{0}")]
    Rejected(String),

    /// Squawk and clearance-flag operations need the drawing delegate.
    #[error(
        "To {action}, the EFS plugin must be allowed to draw on radar screen. \
         Please allow it in OTHER SET / Plug-ins ... menu."
    )]
    NoTagDelegate { action: &'static str },
}

/// What a successfully executed command asks of the caller.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandReply {
    /// Diagnostic line, debug-channel only.
    pub info: Option<String>,
    /// Callsign whose flight-plan data should be republished.
    pub republish: Option<String>,
    /// Whether the caller should run a full-state refresh.
    pub refresh: bool,
}

impl CommandReply {
    fn none() -> Self {
        Self::default()
    }

    fn info(message: String) -> Self {
        Self {
            info: Some(message),
            ..Self::default()
        }
    }
}

/// Set the scratch pad, optionally restoring the previous content afterwards.
///
/// The momentary write is enough for the host to propagate the value to other
/// clients; restoring keeps the visible pad unchanged. `content` is UTF-8 and
/// crosses the encoding boundary here; the restored value is the host's own
/// bytes, written back untouched.
pub fn update_scratch_pad<H: Host>(
    host: &mut H,
    context: &'static str,
    callsign: &str,
    content: &str,
    restore_after: bool,
) -> Result<(), CommandError> {
    let callsign = callsign.to_ascii_uppercase();
    let fp = host
        .find_flight_plan(&callsign)
        .ok_or_else(|| CommandError::FlightPlanNotFound {
            context,
            callsign: callsign.clone(),
        })?;

    let original = fp.assigned.scratch_pad;
    if !host.set_scratch_pad(&callsign, &to_legacy(content)) {
        return Err(CommandError::Rejected(format!(
            "Failed to set scratch pad for {callsign}"
        )));
    }
    if restore_after && !host.set_scratch_pad(&callsign, original.as_bytes()) {
        return Err(CommandError::Rejected(format!(
            "Failed to reset scratch pad for {callsign}"
        )));
    }
    Ok(())
}

/// Take over a flight plan.
///
/// Accepts the handoff when one is offered to the local operator, starts
/// tracking when the plan is untracked, and does nothing when someone else
/// already tracks it. Starting a track asks for a republish so the peer sees
/// the new tracking controller immediately.
fn assume<H: Host>(host: &mut H, callsign: &str) -> Result<CommandReply, CommandError> {
    let callsign = callsign.to_ascii_uppercase();
    if callsign.is_empty() {
        return Err(CommandError::EmptyCallsign { context: "assume" });
    }
    let fp = host
        .find_flight_plan(&callsign)
        .ok_or_else(|| CommandError::FlightPlanNotFound {
            context: "assume",
            callsign: callsign.clone(),
        })?;

    let my_callsign = host
        .myself()
        .map(|me| to_utf8(me.callsign.as_bytes()))
        .unwrap_or_default();
    let handoff_target = to_utf8(fp.handoff_target.as_bytes());
    let tracking = to_utf8(fp.tracking_controller.as_bytes());

    if !handoff_target.is_empty() && !my_callsign.is_empty() && handoff_target == my_callsign {
        host.accept_handoff(&callsign);
        Ok(CommandReply::info(format!(
            "Accepted handoff for {callsign}"
        )))
    } else if tracking.is_empty() {
        if host.start_tracking(&callsign) {
            Ok(CommandReply {
                info: Some(format!("Started tracking {callsign}")),
                republish: Some(callsign),
                refresh: false,
            })
        } else {
            Err(CommandError::Rejected(format!(
                "Failed to start tracking {callsign}"
            )))
        }
    } else {
        Ok(CommandReply::info(format!(
            "{callsign} already tracked by {tracking}"
        )))
    }
}

/// Hand a flight plan off: to the coordinated next controller when one is
/// set, otherwise drop the track.
fn transfer<H: Host>(host: &mut H, callsign: &str) -> Result<CommandReply, CommandError> {
    let callsign = callsign.to_ascii_uppercase();
    if callsign.is_empty() {
        return Err(CommandError::EmptyCallsign { context: "transfer" });
    }
    let fp = host
        .find_flight_plan(&callsign)
        .ok_or_else(|| CommandError::FlightPlanNotFound {
            context: "transfer",
            callsign: callsign.clone(),
        })?;

    let next = to_utf8(fp.next_controller.as_bytes());
    if !next.is_empty() {
        if host.initiate_handoff(&callsign, &next) {
            Ok(CommandReply::info(format!(
                "Handoff initiated to {next} for {callsign}"
            )))
        } else {
            Err(CommandError::Rejected(format!(
                "Failed to initiate handoff for {callsign}"
            )))
        }
    } else if host.end_tracking(&callsign) {
        Ok(CommandReply::info(format!("Ended tracking {callsign}")))
    } else {
        Err(CommandError::Rejected(format!(
            "Failed to end tracking {callsign}"
        )))
    }
}

/// Rewrite the route's leading term and re-amend the plan.
fn set_route_prefix<H: Host>(
    host: &mut H,
    context: &'static str,
    callsign: &str,
    rewrite: impl FnOnce(&str, &crate::host::FlightPlanSnapshot) -> String,
) -> Result<CommandReply, CommandError> {
    let callsign = callsign.to_ascii_uppercase();
    let fp = host
        .find_flight_plan(&callsign)
        .ok_or_else(|| CommandError::FlightPlanNotFound {
            context,
            callsign: callsign.clone(),
        })?;

    let current_route = to_utf8(fp.route.as_bytes());
    let new_route = rewrite(&current_route, &fp);
    host.set_route(&callsign, &to_legacy(&new_route));
    host.amend_flight_plan(&callsign);
    Ok(CommandReply::info(format!(
        "{context}: new route: {new_route}"
    )))
}

/// Execute one inbound command against the host.
///
/// `tag` is the optional drawing-surface capability; commands that need it
/// fail with an operator instruction when it is absent.
pub fn execute<H: Host>(
    host: &mut H,
    tag: Option<&mut dyn TagDelegate>,
    command: &InboundCommand,
) -> Result<CommandReply, CommandError> {
    match command {
        InboundCommand::SetGroundState { callsign, state } => {
            if callsign.is_empty() || state.is_empty() {
                return Err(CommandError::InvalidGroundState);
            }
            update_scratch_pad(host, "setGroundState", callsign, state, true)?;
            Ok(CommandReply::info(format!(
                "setGroundState: {callsign} {state}"
            )))
        }

        InboundCommand::SetClearedToLand { callsign } => {
            if callsign.is_empty() {
                return Err(CommandError::EmptyCallsign {
                    context: "setClearedToLand",
                });
            }
            update_scratch_pad(host, "setClearedToLand", callsign, "/EFS/CTL", true)?;
            Ok(CommandReply::none())
        }

        InboundCommand::Refresh => Ok(CommandReply {
            refresh: true,
            ..CommandReply::default()
        }),

        InboundCommand::Assume { callsign } => assume(host, callsign),

        InboundCommand::Transfer { callsign } => transfer(host, callsign),

        InboundCommand::ResetSquawk { callsign } => match tag {
            Some(tag) => {
                tag.allocate_squawk(&callsign.to_ascii_uppercase());
                Ok(CommandReply::info(format!("resetSquawk: {callsign}")))
            }
            None => Err(CommandError::NoTagDelegate {
                action: "reset squawk",
            }),
        },

        InboundCommand::ToggleClearanceFlag { callsign } => match tag {
            Some(tag) => {
                tag.toggle_clearance_flag(&callsign.to_ascii_uppercase());
                Ok(CommandReply::none())
            }
            None => Err(CommandError::NoTagDelegate {
                action: "toggle clearance flag",
            }),
        },

        InboundCommand::AssignDepartureRunway { callsign, runway } => {
            set_route_prefix(host, "assignDepartureRunway", callsign, |current, fp| {
                let origin = to_utf8(fp.origin.as_bytes());
                route::assign_runway(current, &origin, runway)
            })
        }

        InboundCommand::AssignSid { callsign, sid } => {
            set_route_prefix(host, "assignSid", callsign, |current, fp| {
                let current_runway = to_utf8(fp.departure_runway.as_bytes());
                route::assign_sid(current, &current_runway, sid)
            })
        }

        InboundCommand::AssignHeading { callsign, heading } => {
            let callsign = callsign.to_ascii_uppercase();
            if host.find_flight_plan(&callsign).is_none() {
                return Err(CommandError::FlightPlanNotFound {
                    context: "assignHeading",
                    callsign,
                });
            }
            if host.set_assigned_heading(&callsign, *heading) {
                Ok(CommandReply::none())
            } else {
                Err(CommandError::Rejected(format!(
                    "assignHeading: Failed for {callsign}"
                )))
            }
        }

        InboundCommand::AssignCfl { callsign, altitude } => {
            let callsign = callsign.to_ascii_uppercase();
            if host.find_flight_plan(&callsign).is_none() {
                return Err(CommandError::FlightPlanNotFound {
                    context: "assignCfl",
                    callsign,
                });
            }
            if host.set_cleared_altitude(&callsign, *altitude) {
                Ok(CommandReply::none())
            } else {
                Err(CommandError::Rejected(format!(
                    "assignCfl: Failed for {callsign}"
                )))
            }
        }
    }
}
