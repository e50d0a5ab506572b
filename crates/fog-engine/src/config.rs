//! Configuration loading for the exploration engine.
//!
//! Reveal ranges and update intervals are empirically tuned game-balance
//! numbers; they live here as named settings loaded from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reveal radii and range modifiers
    #[serde(default)]
    pub ranges: RangeConfig,
    /// Batching intervals
    #[serde(default)]
    pub timing: TimingConfig,
    /// World feature learning
    #[serde(default)]
    pub features: FeatureConfig,
    /// User-facing toggles
    #[serde(default)]
    pub settings: FogSettings,
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Returns this configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Reveal radii, in tile hops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    /// Radius for followed objects re-revealing after a move
    pub follow_range: u32,
    /// Radius for aerial units in the periodic batch
    pub aerial_follow_range: u32,
    /// Radius for aerial units after a snap, ignoring terrain
    pub aerial_sight_range: u32,
    /// Hops searched when snapping an aerial unit to its nearest tile
    pub aerial_snap_radius: u32,
    /// Radius of the pre-game hover preview
    pub preview_range: u32,
    /// Radius revealed around a quest site drawn while hidden
    pub quest_site_range: u32,
    /// Radius revealed around a settlement learned through recruitment
    pub recruitment_range: u32,
    /// Radius revealed around a settlement learned through interrogation
    pub interrogation_range: u32,
    /// Hilliness level at which vantage bonus starts
    pub hill_vantage_offset: i32,
    /// Flat bonus added to the remaining range in the terrain check
    pub terrain_range_bonus: f32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            follow_range: 7,
            aerial_follow_range: 9,
            aerial_sight_range: 10,
            aerial_snap_radius: 5,
            preview_range: 7,
            quest_site_range: 1,
            recruitment_range: 3,
            interrogation_range: 4,
            hill_vantage_offset: 1,
            terrain_range_bonus: 0.0,
        }
    }
}

/// Batching intervals, in host ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Interval between movement-triggered reveal batches
    pub update_interval_ticks: u64,
    /// Calls to skip between aerial snap checks for one unit
    pub aerial_update_interval_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            update_interval_ticks: 2500,
            aerial_update_interval_ticks: 100,
        }
    }
}

/// World feature learning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Explored fraction a feature must exceed to become learned
    pub learn_threshold: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            learn_threshold: 0.25,
        }
    }
}

/// User-facing fog toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    /// Treat every explored tile as visible once play has started
    pub disable_fog_of_war: bool,
    /// Show the whole map as explored during world selection
    pub reveal_initial_map: bool,
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Exploration Engine Configuration

[ranges]
follow_range = 7
aerial_follow_range = 9
aerial_sight_range = 10
aerial_snap_radius = 5
preview_range = 7
quest_site_range = 1
recruitment_range = 3
interrogation_range = 4
hill_vantage_offset = 1
terrain_range_bonus = 0.0

[timing]
update_interval_ticks = 2500
aerial_update_interval_ticks = 100

[features]
learn_threshold = 0.25

[settings]
disable_fog_of_war = false
reveal_initial_map = false
"#
    .to_string()
}
