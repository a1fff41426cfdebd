//! Runtime geometry configuration loaded from `assets/geometry.toml`.
//!
//! [`GeometryConfig`] is a Bevy [`Resource`] mirroring the tunable subset of
//! [`crate::constants`]. At startup, [`load_geometry_config`] reads
//! [`CONFIG_PATH`] and replaces the defaults with whatever the file sets.
//! Missing keys fall back to the compile-time defaults, so a minimal TOML can
//! override just the values you care about.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/geometry.toml`.
//! 2. Restart the demo, no recompilation required.
//!
//! `src/constants.rs` remains the authoritative default source used by
//! `GeometryConfig::default()`.

use crate::constants::*;
use crate::error::{validate_non_negative, validate_positive, ConfigError};
use bevy::prelude::*;
use serde::Deserialize;

/// Location of the optional config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/geometry.toml";

/// Runtime-tunable screen and body defaults.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    // ── Screen Bounds ─────────────────────────────────────────────────────────
    pub screen_width: f32,
    pub screen_height: f32,

    // ── Screen Wrap ───────────────────────────────────────────────────────────
    pub reflect_grace_period: f32,
    pub default_effective_width: f32,
    pub default_effective_height: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            reflect_grace_period: REFLECT_GRACE_PERIOD,
            default_effective_width: DEFAULT_EFFECTIVE_WIDTH,
            default_effective_height: DEFAULT_EFFECTIVE_HEIGHT,
        }
    }
}

impl GeometryConfig {
    /// Parse and validate a TOML document. Keys not present keep their
    /// defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GeometryConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the wrap logic cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_positive("screen_width", self.screen_width)?;
        validate_positive("screen_height", self.screen_height)?;
        validate_non_negative("reflect_grace_period", self.reflect_grace_period)?;
        validate_non_negative("default_effective_width", self.default_effective_width)?;
        validate_non_negative("default_effective_height", self.default_effective_height)?;
        Ok(())
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn default_effective_extents(&self) -> Vec2 {
        Vec2::new(self.default_effective_width, self.default_effective_height)
    }
}

/// Startup system: load [`CONFIG_PATH`] into the `GeometryConfig` resource.
///
/// A missing file keeps the defaults already in place. Parse and validation
/// errors are logged and also keep the defaults.
pub fn load_geometry_config(mut config: ResMut<GeometryConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match GeometryConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded geometry config from {CONFIG_PATH}");
            }
            Err(e) => {
                warn!("{CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}
