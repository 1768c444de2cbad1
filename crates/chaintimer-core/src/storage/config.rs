//! TOML-based application configuration.
//!
//! Stores user preferences that sit outside the persisted timer state:
//! - Default settings applied to newly created groups
//! - The nudge reminder interval
//!
//! Configuration is stored at `~/.config/chaintimer/config.toml`. A file
//! that fails to parse is logged and replaced by defaults; the persisted
//! timer state is untouched.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::data_dir;
use crate::settings::Settings;
use crate::wakeup::NUDGE_INTERVAL_SECS;

/// Application configuration, serialized to/from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings copied onto each newly created group.
    #[serde(default)]
    pub defaults: Settings,
    /// Seconds between nudge reminder pulses.
    #[serde(default = "default_nudge_interval")]
    pub nudge_interval_secs: u32,
}

fn default_nudge_interval() -> u32 {
    NUDGE_INTERVAL_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Settings::default(),
            nudge_interval_secs: NUDGE_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the config, falling back to defaults if the file is missing or
    /// unreadable.
    pub fn load() -> Self {
        let path = match Self::path() {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "config dir unavailable, using defaults");
                return Self::default();
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config parse failed, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RepeatStyle;

    #[test]
    fn default_nudge_interval_is_one_minute() {
        assert_eq!(Config::default().nudge_interval_secs, 60);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[defaults]\nrepeat_style = \"group\"\n").unwrap();
        assert_eq!(config.defaults.repeat_style, RepeatStyle::Group);
        assert_eq!(config.nudge_interval_secs, 60);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = Config::default();
        config.nudge_interval_secs = 30;
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.nudge_interval_secs, 30);
    }
}
