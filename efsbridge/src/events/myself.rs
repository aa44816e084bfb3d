//! Self/runway-configuration snapshot, republished periodically.

use crate::encoding::is_valid_utf8;
use crate::host::{AirportElement, HostText, RunwayElement};
use crate::protocol::{RunwayConfig, RunwayConfigEntry};

/// Iteration caps bounding the per-republish work on large sector files.
pub const MAX_AIRPORTS: usize = 1000;
pub const MAX_RUNWAYS: usize = 1000;

/// Validate a sector-element name: valid UTF-8, within `max_len` bytes, and
/// non-empty once all whitespace is stripped.
fn element_name(name: &HostText, max_len: usize) -> Option<String> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > max_len || !is_valid_utf8(bytes) {
        return None;
    }
    let stripped: String = std::str::from_utf8(bytes)
        .ok()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

/// Set one per-runway active flag, creating intermediate entries as needed.
fn set_runway_flag(config: &mut RunwayConfig, airport: &str, runway: &str, key: &str) {
    let airport_entry = config.entry(airport.to_string()).or_default();
    let entry = airport_entry
        .entry(runway.to_string())
        .or_insert_with(|| RunwayConfigEntry::Runway(Default::default()));
    if let RunwayConfigEntry::Runway(flags) = entry {
        flags.insert(key.to_string(), true);
    }
}

/// Assemble the active runway configuration from the sector-file elements.
///
/// Airports contribute plain `arr`/`dep` flags; runways contribute per-name
/// flag maps under the same airport key. Inactive elements leave no entry.
pub fn runway_config(airports: &[AirportElement], runways: &[RunwayElement]) -> RunwayConfig {
    let mut config = RunwayConfig::new();

    for airport in airports.iter().take(MAX_AIRPORTS) {
        let Some(name) = element_name(&airport.name, 10) else {
            continue;
        };
        if airport.arrival_active {
            config
                .entry(name.clone())
                .or_default()
                .insert("arr".to_string(), RunwayConfigEntry::Active(true));
        }
        if airport.departure_active {
            config
                .entry(name)
                .or_default()
                .insert("dep".to_string(), RunwayConfigEntry::Active(true));
        }
    }

    for runway in runways.iter().take(MAX_RUNWAYS) {
        let Some(airport) = element_name(&runway.airport, 10) else {
            continue;
        };
        for end in runway.ends.iter().flatten() {
            let Some(name) = element_name(&end.name, 5) else {
                continue;
            };
            if end.arrival_active {
                set_runway_flag(&mut config, &airport, &name, "arr");
            }
            if end.departure_active {
                set_runway_flag(&mut config, &airport, &name, "dep");
            }
        }
    }

    config
}
