//! The map façade.
//!
//! [`GameMap`] owns the tile grid, the resource nodes, the published
//! passability grid and the fog of war, and is the only way the rest of the
//! game mutates them.

use frontier_common::{
    FactionId, FrontierResult, MapError, MapResult, SchemaVersion, SnapshotError, TileCoord,
};
use tracing::{debug, info};

use crate::config::MapConfig;
use crate::pathfinding::{PassabilityGrid, PathResult, Pathfinder, SharedPassability};
use crate::resources::{ResourceNode, ResourcePlacer, ResourceType};
use crate::snapshot::MapSnapshot;
use crate::terrain::TerrainGenerator;
use crate::tile::{TerrainType, Tile, TileGrid};
use crate::visibility::{FogOfWar, Observer};

/// A generated, playable map.
#[derive(Debug)]
pub struct GameMap {
    /// Configuration the map was built with
    config: MapConfig,
    /// Terrain
    grid: TileGrid,
    /// Resource nodes in placement order
    resources: Vec<ResourceNode>,
    /// Published passability snapshot
    passability: SharedPassability,
    /// Fog of war
    fog: FogOfWar,
    /// Drives regrowth rolls
    regrowth_rng: fastrand::Rng,
    /// Starting area centers
    starting_positions: [TileCoord; 2],
    /// Terrain came from the fallback generator
    used_fallback: bool,
}

impl GameMap {
    /// Generates terrain, places resources and builds the passability grid.
    ///
    /// Never fails: invalid generation input yields the deterministic
    /// fallback terrain, reported by [`GameMap::used_fallback`].
    #[must_use]
    pub fn generate(config: MapConfig) -> Self {
        let generator = TerrainGenerator::new(config.generation);
        let (mut grid, error) = generator.generate_reporting(config.width, config.height);

        let mut placer = ResourcePlacer::new(
            config.generation.resource_density,
            config.seed().wrapping_add(1),
        );
        let resources = placer.place(&mut grid);

        let map = Self::assemble(config, grid, resources, error.is_some());
        info!(
            "Map ready: {}x{}, seed {}, {} resource nodes{}",
            map.width(),
            map.height(),
            map.config.seed(),
            map.resources.len(),
            if map.used_fallback { " (fallback terrain)" } else { "" },
        );
        map
    }

    /// Restores a map from a snapshot. Dimensions and seed come from the
    /// snapshot; everything else from `config`.
    pub fn from_snapshot(snapshot: MapSnapshot, mut config: MapConfig) -> FrontierResult<Self> {
        snapshot.validate()?;
        let MapSnapshot {
            seed,
            width,
            height,
            tiles,
            resources,
            ..
        } = snapshot;

        let actual = tiles.len();
        let grid = TileGrid::from_tiles(width, height, tiles).ok_or(
            SnapshotError::TileCountMismatch {
                expected: width as usize * height as usize,
                actual,
            },
        )?;

        config.width = width;
        config.height = height;
        config.generation.seed = seed;
        info!(
            "Restored {}x{} map (seed {}) with {} resource nodes",
            width,
            height,
            seed,
            resources.len()
        );
        Ok(Self::assemble(config, grid, resources, false))
    }

    fn assemble(
        mut config: MapConfig,
        grid: TileGrid,
        resources: Vec<ResourceNode>,
        used_fallback: bool,
    ) -> Self {
        let (width, height) = (grid.width(), grid.height());
        config.width = width;
        config.height = height;
        Self {
            passability: SharedPassability::new(PassabilityGrid::from_tiles(&grid)),
            fog: FogOfWar::new(width, height, config.fog_sharing),
            regrowth_rng: fastrand::Rng::with_seed(config.seed().wrapping_add(2)),
            starting_positions: TerrainGenerator::starting_positions(width, height),
            config,
            grid,
            resources,
            used_fallback,
        }
    }

    // === Accessors ===

    /// Configuration the map was built with.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Map width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Map height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Tile at `(x, y)`, or `None` out of bounds.
    #[must_use]
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.grid.get(TileCoord::new(x, y))
    }

    /// The full tile grid.
    #[must_use]
    pub const fn tiles(&self) -> &TileGrid {
        &self.grid
    }

    /// All resource nodes, depleted ones included.
    #[must_use]
    pub fn resources(&self) -> &[ResourceNode] {
        &self.resources
    }

    /// Centers of the two starting areas.
    #[must_use]
    pub const fn starting_positions(&self) -> [TileCoord; 2] {
        self.starting_positions
    }

    /// Whether generation fell back to the checkerboard terrain.
    #[must_use]
    pub const fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    // === Resources ===

    /// Resource node on `(x, y)`, depleted or not.
    #[must_use]
    pub fn resource_at(&self, x: i32, y: i32) -> Option<&ResourceNode> {
        self.resources.iter().find(|n| n.is_at(x, y))
    }

    /// Every node of one type, in placement order.
    #[must_use]
    pub fn resources_by_type(&self, resource_type: ResourceType) -> Vec<&ResourceNode> {
        self.resources
            .iter()
            .filter(|n| n.resource_type == resource_type)
            .collect()
    }

    /// Closest non-depleted node of a type by straight-line distance.
    #[must_use]
    pub fn nearest_resource(
        &self,
        resource_type: ResourceType,
        from: TileCoord,
    ) -> Option<&ResourceNode> {
        self.resources
            .iter()
            .filter(|n| n.resource_type == resource_type && !n.depleted)
            .min_by_key(|n| n.coord().distance_squared(from))
    }

    /// Takes up to `amount` units from the node on `(x, y)`, returning how
    /// much was gathered. A node that runs dry frees its tile for building.
    pub fn gather_resource(&mut self, x: i32, y: i32, amount: u32) -> MapResult<u32> {
        let coord = TileCoord::new(x, y);
        if !self.grid.in_bounds(coord) {
            return Err(MapError::OutOfBounds { x, y });
        }
        let node = self
            .resources
            .iter_mut()
            .find(|n| n.is_at(x, y))
            .ok_or(MapError::NoResource { x, y })?;
        if node.depleted {
            return Err(MapError::ResourceDepleted { x, y });
        }

        let taken = node.take(amount);
        if node.depleted {
            if let Some(tile) = self.grid.get_mut(coord) {
                tile.buildable = true;
            }
            debug!("{:?} node at {} depleted", node.resource_type, coord);
        }
        Ok(taken)
    }

    /// Per-tick maintenance. Each depleted renewable node regrows with
    /// probability `chance_per_time_unit * delta_time`. Returns how many
    /// nodes regrew.
    pub fn update(&mut self, delta_time: f32) -> usize {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return 0;
        }
        let chance = self.config.regrowth.chance_per_time_unit * delta_time;
        let fraction = self.config.regrowth.restore_fraction;

        let mut regrown = 0;
        for node in &mut self.resources {
            if !node.depleted || !node.resource_type.is_renewable() {
                continue;
            }
            if self.regrowth_rng.f32() < chance {
                node.regrow(fraction);
                if let Some(tile) = self.grid.get_mut(node.coord()) {
                    tile.buildable = false;
                }
                debug!(
                    "{:?} node at {} regrew to {}",
                    node.resource_type,
                    node.coord(),
                    node.amount
                );
                regrown += 1;
            }
        }
        regrown
    }

    // === Terrain ===

    /// Whether a `width × height` footprint anchored at `(x, y)` lies fully
    /// on the map and every tile in it is buildable and passable. Empty
    /// footprints are rejected.
    ///
    /// The passability check keeps Mountains out even when a depleted mineral
    /// node has left its tile flagged buildable.
    #[must_use]
    pub fn is_terrain_buildable(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return false;
        };
        if w == 0 || h == 0 {
            return false;
        }
        (0..h).all(|dy| {
            (0..w).all(|dx| match (x.checked_add(dx), y.checked_add(dy)) {
                (Some(tx), Some(ty)) => {
                    self.tile(tx, ty).is_some_and(|t| t.buildable && t.passable)
                },
                _ => false,
            })
        })
    }

    /// Changes the terrain of one tile.
    ///
    /// Flags are re-derived from the new terrain, except that a tile holding
    /// a live resource stays unbuildable. A passability change publishes a
    /// rebuilt grid; pathfinders taken earlier keep the old one.
    pub fn set_terrain(&mut self, x: i32, y: i32, terrain: TerrainType) -> MapResult<()> {
        let has_live_resource = self
            .resources
            .iter()
            .any(|n| n.is_at(x, y) && !n.depleted);
        let tile = self
            .grid
            .get_mut(TileCoord::new(x, y))
            .ok_or(MapError::OutOfBounds { x, y })?;

        let was_passable = tile.passable;
        tile.set_terrain(terrain);
        if has_live_resource {
            tile.buildable = false;
        }

        if tile.passable != was_passable {
            let generation = self
                .passability
                .publish(PassabilityGrid::from_tiles(&self.grid));
            debug!(
                "Tile ({}, {}) became {:?}, passability generation {}",
                x, y, terrain, generation
            );
        }
        Ok(())
    }

    // === Pathfinding ===

    /// Path query handle over the current passability grid.
    #[must_use]
    pub fn pathfinder(&self) -> Pathfinder {
        Pathfinder::new(self.passability.snapshot(), self.config.pathfinding)
    }

    /// Shortest 8-connected path from `start` to `goal`, both inclusive.
    pub fn find_path(&self, start: TileCoord, goal: TileCoord) -> PathResult {
        self.pathfinder().find_path(start, goal)
    }

    // === Visibility ===

    /// Recomputes the shared fog from unit positions with one view range.
    pub fn update_visibility(&mut self, positions: &[TileCoord], view_range: f32) {
        let observers: Vec<_> = positions
            .iter()
            .map(|&p| Observer::new(p, view_range))
            .collect();
        self.fog.update(FactionId::PLAYER, &observers);
    }

    /// Whether `(x, y)` is visible in the shared fog.
    #[must_use]
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.fog.shared().is_visible(x, y)
    }

    /// Whether `(x, y)` has been explored in the shared fog.
    #[must_use]
    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.fog.shared().is_explored(x, y)
    }

    /// Recomputes one faction's fog.
    pub fn update_faction_visibility(&mut self, faction: FactionId, observers: &[Observer]) {
        self.fog.update(faction, observers);
    }

    /// Whether `(x, y)` is visible to `faction`.
    #[must_use]
    pub fn is_visible_to(&self, faction: FactionId, x: i32, y: i32) -> bool {
        self.fog.is_visible(faction, x, y)
    }

    /// Whether `faction` has explored `(x, y)`.
    #[must_use]
    pub fn is_explored_by(&self, faction: FactionId, x: i32, y: i32) -> bool {
        self.fog.is_explored(faction, x, y)
    }

    /// The fog of war.
    #[must_use]
    pub const fn fog(&self) -> &FogOfWar {
        &self.fog
    }

    // === Persistence ===

    /// Captures terrain and resources for a save system.
    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            version: SchemaVersion::MAP_SNAPSHOT,
            seed: self.config.seed(),
            width: self.width(),
            height: self.height(),
            tiles: self.grid.tiles().to_vec(),
            resources: self.resources.clone(),
        }
    }
}
