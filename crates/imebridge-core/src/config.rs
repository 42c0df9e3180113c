use crate::error::{Error, Result};
use crate::positioner::PositionerConfig;
use crate::types::SessionMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mode a new session starts in.
    pub initial_mode: SessionMode,
    /// A lone Shift tap switches between Chinese and English.
    #[serde(default = "default_shift_toggles_mode")]
    pub shift_toggles_mode: bool,
    /// A Shift held longer than this is not a tap.
    #[serde(default = "default_shift_tap_max_ms")]
    pub shift_tap_max_ms: u64,
}

fn default_shift_toggles_mode() -> bool {
    true
}

fn default_shift_tap_max_ms() -> u64 {
    500
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_mode: SessionMode::default(),
            shift_toggles_mode: default_shift_toggles_mode(),
            shift_tap_max_ms: default_shift_tap_max_ms(),
        }
    }
}

/// Bridge settings. Every field falls back to its default when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub positioner: PositionerConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        debug!(?config, "Parsed configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.positioner;
        if p.gap_below < 0 || p.gap_above < 0 {
            return Err(Error::Invalid(format!(
                "panel gaps must not be negative (below={}, above={})",
                p.gap_below, p.gap_above
            )));
        }
        Ok(())
    }
}
