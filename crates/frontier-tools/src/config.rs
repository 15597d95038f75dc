//! Map generator configuration.
//!
//! Wraps [`MapConfig`] with preview settings. Loaded from and saved to a
//! TOML file; command-line flags override file values.

use frontier_common::{FrontierError, FrontierResult};
use frontier_map::{MapConfig, MAX_DIMENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "frontier.toml";

/// Map generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapgenConfig {
    // === Preview Settings ===
    /// Draw resource glyphs over terrain
    pub show_resources: bool,
    /// View range of the observers placed on starting positions for fog previews
    pub preview_view_range: f32,

    // === Map Settings ===
    /// Map size, generation, pathfinding, regrowth and fog settings
    pub map: MapConfig,
}

impl Default for MapgenConfig {
    fn default() -> Self {
        Self {
            show_resources: true,
            preview_view_range: 12.0,
            map: MapConfig::default(),
        }
    }
}

impl MapgenConfig {
    /// Loads configuration from `path`.
    /// Returns defaults if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Loads configuration from `path`, surfacing read and parse errors.
    pub fn load_strict<P: AsRef<Path>>(path: P) -> FrontierResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&contents).map_err(|e| FrontierError::Config(e.to_string()))?;
        config.validate();
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Clamps values to ranges the generator accepts.
    pub fn validate(&mut self) {
        self.map.width = self.map.width.clamp(1, MAX_DIMENSION);
        self.map.height = self.map.height.clamp(1, MAX_DIMENSION);

        let generation = &mut self.map.generation;
        if !generation.resource_density.is_finite() {
            generation.resource_density = 0.0;
        }
        generation.resource_density = generation.resource_density.clamp(0.0, 1.0);
        if !generation.terrain_variation.is_finite() || generation.terrain_variation <= 0.0 {
            generation.terrain_variation = 1.5;
        }

        self.map.pathfinding.goal_search_radius = self.map.pathfinding.goal_search_radius.min(64);
        self.preview_view_range = self.preview_view_range.clamp(0.0, 256.0);
    }
}
