//! Scene-wide configuration, loadable from TOML.

use crate::error::ConfigError;
use crate::forklift::ForkliftConfig;
use crate::input::KeyBindings;
use crate::printer::PrinterConfig;
use crate::shelf::ShelfConfig;
use serde::{Deserialize, Serialize};

/// Largest frame delta fed to the simulation, in seconds.
pub const MAX_DELTA: f32 = 1.0 / 24.0;

/// Configuration of the whole warehouse scene.
///
/// Every section is optional in TOML; missing values fall back to
/// [`Default`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Upper bound on a single frame's delta, so a long pause (a
    /// backgrounded window) cannot teleport the vehicle.
    pub max_delta: f32,
    pub printer: PrinterConfig,
    pub forklift: ForkliftConfig,
    pub shelf: ShelfConfig,
    pub controls: KeyBindings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_delta: MAX_DELTA,
            printer: PrinterConfig::default(),
            forklift: ForkliftConfig::default(),
            shelf: ShelfConfig::default(),
            controls: KeyBindings::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Writes the full configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
