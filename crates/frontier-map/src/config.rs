//! Map configuration.
//!
//! Every tunable of the map core lives here and is passed in at construction;
//! nothing is read from global state.

use serde::{Deserialize, Serialize};

use crate::visibility::FogSharing;

/// Largest accepted map dimension on either axis.
pub const MAX_DIMENSION: u32 = 4096;

/// Options consumed by terrain generation and resource placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Seed for every random draw
    pub seed: u64,
    /// Contrast applied to the octave sum before clamping to [-1, 1]
    pub terrain_variation: f64,
    /// Fraction of tiles that receive a resource node (0.0 - 1.0)
    pub resource_density: f64,
    /// Mirror noise sampling about the map center
    pub symmetric: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            terrain_variation: 1.5,
            resource_density: 0.12,
            symmetric: false,
        }
    }
}

/// Pathfinding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// BFS bound (in steps) when redirecting an impassable goal
    pub goal_search_radius: u32,
    /// Allow diagonal steps between two blocked orthogonal neighbors
    pub allow_corner_cutting: bool,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            goal_search_radius: 5,
            allow_corner_cutting: true,
        }
    }
}

/// Regrowth of depleted renewable resources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegrowthConfig {
    /// Per-node regrow probability per unit of `delta_time`
    pub chance_per_time_unit: f32,
    /// Fraction of the original amount restored on regrowth
    pub restore_fraction: f32,
}

impl Default for RegrowthConfig {
    fn default() -> Self {
        Self {
            chance_per_time_unit: 0.0001,
            restore_fraction: 0.5,
        }
    }
}

/// Full map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    // === Dimensions ===
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,

    // === Generation ===
    /// Terrain and resource generation options
    pub generation: GenerationOptions,

    // === Simulation ===
    /// Pathfinding parameters
    pub pathfinding: PathfindingConfig,
    /// Resource regrowth parameters
    pub regrowth: RegrowthConfig,
    /// Whether factions share one fog grid or get their own
    pub fog_sharing: FogSharing,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            generation: GenerationOptions::default(),
            pathfinding: PathfindingConfig::default(),
            regrowth: RegrowthConfig::default(),
            fog_sharing: FogSharing::Shared,
        }
    }
}

impl MapConfig {
    /// Creates a default configuration with the given size and seed.
    #[must_use]
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            generation: GenerationOptions {
                seed,
                ..GenerationOptions::default()
            },
            ..Self::default()
        }
    }

    /// Sets the resource density.
    #[must_use]
    pub fn with_resource_density(mut self, density: f64) -> Self {
        self.generation.resource_density = density;
        self
    }

    /// Enables or disables symmetric sampling.
    #[must_use]
    pub fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.generation.symmetric = symmetric;
        self
    }

    /// Sets the fog sharing mode.
    #[must_use]
    pub fn with_fog_sharing(mut self, sharing: FogSharing) -> Self {
        self.fog_sharing = sharing;
        self
    }

    /// Returns the generation seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.generation.seed
    }
}
