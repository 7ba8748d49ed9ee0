//! Simulation configuration
//!
//! Tunable constants read by the engine on every step. Hosts may edit them
//! between steps; persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Engine tuning constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Downward acceleration magnitude (px/s²)
    pub gravity: f32,
    /// Linear drag coefficient (0 disables drag)
    pub drag: f32,
    /// Floor speed (px/s) used when gliding a block into alignment with its tile
    pub smooth_snapping_min_velocity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            drag: DEFAULT_DRAG,
            smooth_snapping_min_velocity: DEFAULT_SMOOTH_SNAPPING_MIN_VELOCITY,
        }
    }
}

impl Config {
    /// Config with gravity turned off (useful for isolated horizontal scenes)
    pub fn weightless() -> Self {
        Self {
            gravity: 0.0,
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults when missing or corrupt
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read config {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }
}
