//! Route-string surgery for runway and SID assignment.
//!
//! The host keeps the departure runway and SID inside the filed route, as a
//! leading `NAME/RWY` term. Assignments rewrite only that first term and
//! leave the rest of the route untouched.

/// Whether a route term looks like a pilot-filed SID: exactly five uppercase
/// ASCII letters, one digit, one uppercase letter (e.g. `VADIN3J`).
pub fn is_pilot_sid(term: &str) -> bool {
    let bytes = term.as_bytes();
    bytes.len() == 7
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5].is_ascii_digit()
        && bytes[6].is_ascii_uppercase()
}

/// Split a route into its first term and the remainder.
fn split_first_term(route: &str) -> (&str, Option<&str>) {
    match route.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (route, None),
    }
}

fn with_prefix(prefix: String, rest: Option<&str>) -> String {
    match rest {
        Some(rest) if !rest.is_empty() => format!("{prefix} {rest}"),
        _ => prefix,
    }
}

/// Rewrite `route` so its leading term assigns `runway` at the departure
/// airport.
///
/// An existing `x/y` prefix keeps its left side with the runway swapped; a
/// pilot-filed SID term is discarded in favor of `airport/runway`; any other
/// route gets `airport/runway` prepended in full.
pub fn assign_runway(route: &str, departure_airport: &str, runway: &str) -> String {
    let (first, rest) = split_first_term(route);
    if let Some((left, _)) = first.split_once('/') {
        with_prefix(format!("{left}/{runway}"), rest)
    } else if is_pilot_sid(first) {
        with_prefix(format!("{departure_airport}/{runway}"), rest)
    } else {
        with_prefix(
            format!("{departure_airport}/{runway}"),
            (!route.is_empty()).then_some(route),
        )
    }
}

/// Rewrite `route` so its leading term assigns `sid`, keeping the runway.
///
/// An existing `x/y` prefix keeps its runway side with the SID swapped in; a
/// pilot-filed SID term is replaced by `sid/current_runway`; any other route
/// gets `sid/current_runway` prepended in full.
pub fn assign_sid(route: &str, current_runway: &str, sid: &str) -> String {
    let (first, rest) = split_first_term(route);
    if let Some((_, right)) = first.split_once('/') {
        with_prefix(format!("{sid}/{right}"), rest)
    } else if is_pilot_sid(first) {
        with_prefix(format!("{sid}/{current_runway}"), rest)
    } else {
        with_prefix(
            format!("{sid}/{current_runway}"),
            (!route.is_empty()).then_some(route),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilot_sid_pattern() {
        assert!(is_pilot_sid("VADIN3J"));
        assert!(is_pilot_sid("ABCDE1Z"));
        assert!(!is_pilot_sid("VADIN3")); // too short
        assert!(!is_pilot_sid("VADIN33")); // last char not a letter
        assert!(!is_pilot_sid("vadin3J")); // lowercase
        assert!(!is_pilot_sid("VADI13J")); // digit in the letter block
        assert!(!is_pilot_sid("VADIN3JX")); // too long
    }

    #[test]
    fn runway_replaces_existing_prefix_runway() {
        assert_eq!(
            assign_runway("ESSA/01L DCT ARS", "ESSA", "19R"),
            "ESSA/19R DCT ARS"
        );
        // SID prefixes keep their SID side.
        assert_eq!(
            assign_runway("VADIN3J/01L DCT ARS", "ESSA", "19R"),
            "VADIN3J/19R DCT ARS"
        );
    }

    #[test]
    fn runway_discards_pilot_filed_sid() {
        assert_eq!(
            assign_runway("VADIN3J DCT ARS", "ESSA", "19R"),
            "ESSA/19R DCT ARS"
        );
    }

    #[test]
    fn runway_prepends_when_no_prefix() {
        assert_eq!(
            assign_runway("N0450F350 DCT ARS", "ESSA", "19R"),
            "ESSA/19R N0450F350 DCT ARS"
        );
        assert_eq!(assign_runway("", "ESSA", "19R"), "ESSA/19R");
    }

    #[test]
    fn sid_keeps_existing_prefix_runway() {
        assert_eq!(
            assign_sid("ESSA/01L DCT ARS", "01L", "VADIN3J"),
            "VADIN3J/01L DCT ARS"
        );
        assert_eq!(
            assign_sid("NOSLI2K/19R DCT ARS", "01L", "VADIN3J"),
            "VADIN3J/19R DCT ARS"
        );
    }

    #[test]
    fn sid_replaces_pilot_filed_sid_with_current_runway() {
        assert_eq!(
            assign_sid("NOSLI2K DCT ARS", "19R", "VADIN3J"),
            "VADIN3J/19R DCT ARS"
        );
    }

    #[test]
    fn sid_prepends_when_no_prefix() {
        assert_eq!(
            assign_sid("N0450F350 DCT ARS", "19R", "VADIN3J"),
            "VADIN3J/19R N0450F350 DCT ARS"
        );
        assert_eq!(assign_sid("", "19R", "VADIN3J"), "VADIN3J/19R");
    }

    #[test]
    fn single_term_routes_gain_no_trailing_space() {
        assert_eq!(assign_runway("ESSA/01L", "ESSA", "19R"), "ESSA/19R");
        assert_eq!(assign_sid("VADIN3J", "19R", "NOSLI2K"), "NOSLI2K/19R");
    }
}
