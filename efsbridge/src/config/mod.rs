//! Configuration file handling for ~/.efsbridge/config.ini.
//!
//! Loads and saves the bridge settings with sensible defaults. A missing
//! file or a missing key means "use the default"; only a present value that
//! fails to parse is an error.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

/// Default destination for outbound events.
pub const DEFAULT_OUTBOUND_ADDR: &str = "127.0.0.1:17771";

/// Default bind address for inbound commands.
pub const DEFAULT_INBOUND_ADDR: &str = "127.0.0.1:17772";

/// Default country prefix for the flight-plan filter.
pub const DEFAULT_FILTER_PREFIX: &str = "ES";

/// Default grace period before the periodic self-state republish starts.
pub const DEFAULT_REPUBLISH_WARMUP_SECS: u64 = 10;

/// Default tick divider for the periodic self-state republish.
pub const DEFAULT_REPUBLISH_EVERY_TICKS: u64 = 5;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Bridge runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Whether debug-channel messages are shown to the operator.
    pub debug: bool,
    /// Country prefix a flight plan's origin or destination must carry.
    pub filter_prefix: String,
    /// Destination for outbound event datagrams.
    pub outbound_addr: SocketAddr,
    /// Bind address for inbound command datagrams.
    pub inbound_addr: SocketAddr,
    /// Grace period after enabling before the periodic republish starts.
    pub republish_warmup: Duration,
    /// Self-state republish interval, in timer ticks.
    pub republish_every_ticks: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            debug: false,
            filter_prefix: DEFAULT_FILTER_PREFIX.to_string(),
            outbound_addr: DEFAULT_OUTBOUND_ADDR
                .parse()
                .unwrap_or_else(|_| unreachable!("default address is well-formed")),
            inbound_addr: DEFAULT_INBOUND_ADDR
                .parse()
                .unwrap_or_else(|_| unreachable!("default address is well-formed")),
            republish_warmup: Duration::from_secs(DEFAULT_REPUBLISH_WARMUP_SECS),
            republish_every_ticks: DEFAULT_REPUBLISH_EVERY_TICKS,
        }
    }
}

impl BridgeSettings {
    /// Load settings from the default path (~/.efsbridge/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load settings from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save settings to the default path (~/.efsbridge/config.ini).
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::DirectoryError)?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("bridge"))
            .set("debug", self.debug.to_string())
            .set("filter_prefix", self.filter_prefix.clone());
        ini.with_section(Some("network"))
            .set("outbound_addr", self.outbound_addr.to_string())
            .set("inbound_addr", self.inbound_addr.to_string());
        ini.with_section(Some("republish"))
            .set("warmup_secs", self.republish_warmup.as_secs().to_string())
            .set("every_ticks", self.republish_every_ticks.to_string());

        ini.write_to_file(path)
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

/// Parse an `Ini` object into [`BridgeSettings`].
///
/// Starts from `BridgeSettings::default()` and overlays any values found.
fn parse_ini(ini: &Ini) -> Result<BridgeSettings, ConfigError> {
    let mut settings = BridgeSettings::default();

    if let Some(section) = ini.section(Some("bridge")) {
        if let Some(v) = section.get("debug") {
            settings.debug = v.parse().map_err(|_| ConfigError::InvalidValue {
                section: "bridge".to_string(),
                key: "debug".to_string(),
                value: v.to_string(),
                reason: "must be 'true' or 'false'".to_string(),
            })?;
        }
        if let Some(v) = section.get("filter_prefix") {
            let v = v.trim();
            if v.is_empty() || v.len() > 4 || !v.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(ConfigError::InvalidValue {
                    section: "bridge".to_string(),
                    key: "filter_prefix".to_string(),
                    value: v.to_string(),
                    reason: "must be 1-4 uppercase letters".to_string(),
                });
            }
            settings.filter_prefix = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = section.get("outbound_addr") {
            settings.outbound_addr = v.parse().map_err(|_| ConfigError::InvalidValue {
                section: "network".to_string(),
                key: "outbound_addr".to_string(),
                value: v.to_string(),
                reason: "must be an address like '127.0.0.1:17771'".to_string(),
            })?;
        }
        if let Some(v) = section.get("inbound_addr") {
            settings.inbound_addr = v.parse().map_err(|_| ConfigError::InvalidValue {
                section: "network".to_string(),
                key: "inbound_addr".to_string(),
                value: v.to_string(),
                reason: "must be an address like '127.0.0.1:17772'".to_string(),
            })?;
        }
    }

    if let Some(section) = ini.section(Some("republish")) {
        if let Some(v) = section.get("warmup_secs") {
            let secs: u64 = v.parse().map_err(|_| ConfigError::InvalidValue {
                section: "republish".to_string(),
                key: "warmup_secs".to_string(),
                value: v.to_string(),
                reason: "must be a non-negative integer (seconds)".to_string(),
            })?;
            settings.republish_warmup = Duration::from_secs(secs);
        }
        if let Some(v) = section.get("every_ticks") {
            let ticks: u64 = v.parse().map_err(|_| ConfigError::InvalidValue {
                section: "republish".to_string(),
                key: "every_ticks".to_string(),
                value: v.to_string(),
                reason: "must be a positive integer (ticks)".to_string(),
            })?;
            if ticks == 0 {
                return Err(ConfigError::InvalidValue {
                    section: "republish".to_string(),
                    key: "every_ticks".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer (ticks)".to_string(),
                });
            }
            settings.republish_every_ticks = ticks;
        }
    }

    Ok(settings)
}

/// Get the path to the config directory (~/.efsbridge).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".efsbridge")
}

/// Get the path to the config file (~/.efsbridge/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = BridgeSettings::default();
        assert!(!settings.debug);
        assert_eq!(settings.filter_prefix, "ES");
        assert_eq!(settings.outbound_addr.port(), 17771);
        assert_eq!(settings.inbound_addr.port(), 17772);
        assert_eq!(settings.republish_warmup, Duration::from_secs(10));
        assert_eq!(settings.republish_every_ticks, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BridgeSettings::load_from(&dir.path().join("config.ini")).unwrap();
        assert_eq!(settings, BridgeSettings::default());
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let settings = BridgeSettings {
            debug: true,
            filter_prefix: "ED".to_string(),
            outbound_addr: "127.0.0.1:27771".parse().unwrap(),
            inbound_addr: "127.0.0.1:27772".parse().unwrap(),
            republish_warmup: Duration::from_secs(30),
            republish_every_ticks: 10,
        };
        settings.save_to(&path).unwrap();

        let reloaded = BridgeSettings::load_from(&path).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[bridge]\ndebug = true\n").unwrap();

        let settings = BridgeSettings::load_from(&path).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.filter_prefix, "ES");
        assert_eq!(settings.outbound_addr.port(), 17771);
    }

    #[test]
    fn invalid_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[bridge]\nfilter_prefix = es123\n").unwrap();

        let err = BridgeSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "filter_prefix"));
    }

    #[test]
    fn invalid_address_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[network]\noutbound_addr = not-an-address\n").unwrap();

        let err = BridgeSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "outbound_addr"));
    }

    #[test]
    fn zero_tick_divider_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[republish]\nevery_ticks = 0\n").unwrap();

        let err = BridgeSettings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "every_ticks"));
    }
}
