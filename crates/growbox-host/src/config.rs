//! Host configuration.
//!
//! A host file has a `[host]` table for the run loop and a `[session]` table
//! with the starting state of the simulated player. Both fall back to
//! defaults for missing keys.

use growbox_sim::{ConfigResult, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Run-loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Simulated seconds per tick
    pub tick_seconds: u64,
    /// Simulated seconds to run before printing the final snapshot
    pub run_seconds: u64,
    /// Follow the wall clock instead of fast-forwarding
    pub realtime: bool,
    /// Harvest ready plants automatically
    pub auto_harvest: bool,
    /// Replant emptied slots automatically
    pub auto_replant: bool,
    /// Simulated seconds between progress reports (0 = disabled)
    pub report_every: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_seconds: 1,
            run_seconds: 7200, // two simulated hours
            realtime: false,
            auto_harvest: true,
            auto_replant: true,
            report_every: 600,
        }
    }
}

impl HostSettings {
    /// Clamps values to sensible ranges.
    pub fn validate(&mut self) {
        self.tick_seconds = self.tick_seconds.clamp(1, 3600);
        if self.report_every != 0 {
            self.report_every = self.report_every.max(self.tick_seconds);
        }
    }
}

/// Complete host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Run-loop settings
    pub host: HostSettings,
    /// Starting session state
    pub session: SessionConfig,
}

impl HostConfig {
    /// Parses a TOML document, clamping host settings and validating the session.
    pub fn from_toml_str(toml: &str) -> ConfigResult<Self> {
        let mut config: Self = toml::from_str(toml)?;
        config.host.validate();
        config.session.validate()?;
        Ok(config)
    }

    /// Loads a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded host config from {}", path.display());
        Ok(config)
    }

    /// Loads the file at `path`, or the defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                info!("No config file given, using defaults");
                Ok(Self::default())
            },
        }
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use growbox_sim::ConfigError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = HostConfig::default();
        assert_eq!(config.host.tick_seconds, 1);
        assert_eq!(config.host.run_seconds, 7200);
        assert!(!config.host.realtime);
        assert!(config.host.auto_harvest);
        assert_eq!(config.session.coins, 2500);
    }

    #[test]
    fn test_host_settings_clamped() {
        let toml = r"
            [host]
            tick_seconds = 0
            report_every = 0
        ";
        let config = HostConfig::from_toml_str(toml).expect("parse");
        assert_eq!(config.host.tick_seconds, 1);
        assert_eq!(config.host.report_every, 0);

        let toml = r"
            [host]
            tick_seconds = 60
            report_every = 10
        ";
        let config = HostConfig::from_toml_str(toml).expect("parse");
        assert_eq!(config.host.report_every, 60);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("growbox.toml");

        let mut config = HostConfig::default();
        config.host.run_seconds = 600;
        config.session.coins = 42;
        fs::write(&path, config.to_toml_string().expect("serialize")).expect("write");

        let loaded = HostConfig::load(&path).expect("load");
        assert_eq!(loaded.host.run_seconds, 600);
        assert_eq!(loaded.session.coins, 42);
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = HostConfig::load_or_default(None).expect("defaults");
        assert_eq!(config.host, HostSettings::default());
    }

    #[test]
    fn test_invalid_session_rejected() {
        let toml = r"
            [session.starter_growbox]
            capacity = 0
        ";
        assert!(matches!(
            HostConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }
}
