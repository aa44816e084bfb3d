//! Scratch-pad reclassification.
//!
//! The scratch pad is a free-text field overloaded by convention to encode
//! ground-handling state. The mapping below is a closed, ordered rule set;
//! the first matching rule wins and there is no fallthrough.

/// The marker prefixing a stand assignment, e.g. `GRP/S/A1`.
const STAND_MARKER: &str = "GRP/S/";

/// The exact pad content meaning "cleared to land".
const CLEARED_TO_LAND: &str = "/EFS/CTL";

/// Ground-state tokens passed through under the `groundstate` key.
const GROUND_STATES: [&str; 3] = ["LINEUP", "ONFREQ", "DE-ICE"];

/// What a scratch-pad value means on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScratchClassification {
    /// One of the known ground-state tokens.
    GroundState(String),
    /// The cleared-to-land marker.
    ClearedToLand,
    /// A stand assignment; carries everything after the `GRP/S/` marker.
    Stand(String),
    /// Anything else, passed through verbatim.
    Scratch(String),
}

/// Classify one scratch-pad value.
pub fn classify(scratch: &str) -> ScratchClassification {
    if GROUND_STATES.contains(&scratch) {
        return ScratchClassification::GroundState(scratch.to_string());
    }
    if scratch == CLEARED_TO_LAND {
        return ScratchClassification::ClearedToLand;
    }
    if scratch.len() > STAND_MARKER.len() {
        if let Some(pos) = scratch.find(STAND_MARKER) {
            return ScratchClassification::Stand(scratch[pos + STAND_MARKER.len()..].to_string());
        }
    }
    ScratchClassification::Scratch(scratch.to_string())
}
