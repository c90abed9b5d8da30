//! Scene configuration for the viewer and headless runs.
//!
//! A [`SceneConfig`] is stored as JSON. Every field has a default, so a
//! partial file (or `{}`) is a valid config:
//!
//! ```json
//! {
//!   "growth_map": "maps/scalp.png",
//!   "density": 40.0,
//!   "attributes": { "group_hairs": 32 }
//! }
//! ```

use crate::error::ConfigError;
use crate::hair_object::{HairAttributes, StrandConfig};
use crate::simulation::SimulationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to grow, simulate and show one hair object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Image masking where hair grows; `None` uses the built-in map.
    pub growth_map: Option<PathBuf>,
    /// Guide hairs per unit surface area, before growth-map rejection.
    pub density: f32,
    pub strand: StrandConfig,
    pub attributes: HairAttributes,
    pub simulation: SimulationConfig,
    /// Radius of the sphere the hair grows on.
    pub sphere_radius: f32,
    pub sphere_stacks: u32,
    pub sphere_slices: u32,
    /// Frame rate of the fixed simulation tick.
    pub target_fps: f32,
    /// Seed for root placement; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Max level for the viewer's log output (`error` .. `trace`).
    pub log_level: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            growth_map: None,
            density: 40.0,
            strand: StrandConfig::default(),
            attributes: HairAttributes::default(),
            simulation: SimulationConfig::default(),
            sphere_radius: 1.0,
            sphere_stacks: 24,
            sphere_slices: 48,
            target_fps: 60.0,
            seed: None,
            log_level: "info".into(),
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density >= 0.0 && self.density.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "density must be a non-negative number, got {}",
                self.density
            )));
        }
        if self.strand.vertices == 0 {
            return Err(ConfigError::Invalid("strands need at least one vertex".into()));
        }
        if !(self.strand.spacing > 0.0 && self.strand.spacing.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "strand spacing must be positive, got {}",
                self.strand.spacing
            )));
        }
        if !(self.target_fps > 0.0 && self.target_fps.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "target_fps must be positive, got {}",
                self.target_fps
            )));
        }
        if !(self.sphere_radius > 0.0) || self.sphere_stacks < 2 || self.sphere_slices < 3 {
            return Err(ConfigError::Invalid(
                "sphere needs a positive radius, at least 2 stacks and 3 slices".into(),
            ));
        }
        let color = self.attributes.color;
        if !color.cmpge(glam::Vec3::ZERO).all() || !color.cmple(glam::Vec3::ONE).all() {
            return Err(ConfigError::Invalid(format!(
                "color channels must lie in [0, 1], got {color}"
            )));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// The configured log level, `INFO` if it does not parse.
    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
