//! Resource nodes and clustered placement.

use frontier_common::TileCoord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::tile::{TerrainType, TileGrid};

/// Random probes spent looking for a cluster center.
pub const CENTER_PROBES: usize = 50;

/// Random probes spent per node inside a cluster box before skipping it.
pub const NODE_PROBES: usize = 8;

/// Half-width of the square a cluster scatters into.
pub const CLUSTER_SPREAD: i32 = 2;

/// Kind of harvestable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Timber, regrows after depletion
    Wood,
    /// Berries and game
    Food,
    /// Gold ore
    Gold,
    /// Quarry stone
    Stone,
    /// Iron ore
    Iron,
}

impl ResourceType {
    /// All resource types, in placement order.
    pub const ALL: [Self; 5] = [Self::Wood, Self::Food, Self::Gold, Self::Stone, Self::Iron];

    /// Share of the global target assigned to this type.
    #[must_use]
    pub const fn share(self) -> f64 {
        match self {
            Self::Wood => 0.40,
            Self::Food => 0.25,
            Self::Gold => 0.15,
            Self::Stone | Self::Iron => 0.10,
        }
    }

    /// Nominal number of nodes per cluster.
    #[must_use]
    pub const fn cluster_size(self) -> u32 {
        match self {
            Self::Wood => 8,
            Self::Food => 4,
            Self::Gold | Self::Stone | Self::Iron => 3,
        }
    }

    /// Base amount before the random factor.
    #[must_use]
    pub const fn base_amount(self) -> u32 {
        match self {
            Self::Wood => 200,
            Self::Food => 150,
            Self::Gold => 400,
            Self::Stone => 300,
            Self::Iron => 250,
        }
    }

    /// Whether this type is a mineral (placed on high ground).
    #[must_use]
    pub const fn is_mineral(self) -> bool {
        matches!(self, Self::Gold | Self::Stone | Self::Iron)
    }

    /// Whether depleted nodes of this type can regrow.
    #[must_use]
    pub const fn is_renewable(self) -> bool {
        matches!(self, Self::Wood)
    }

    /// Whether this type can sit on `terrain`.
    #[must_use]
    pub const fn is_compatible(self, terrain: TerrainType) -> bool {
        if self.is_mineral() {
            matches!(terrain, TerrainType::Hills | TerrainType::Mountains)
        } else {
            matches!(terrain, TerrainType::Plains | TerrainType::Forest)
        }
    }

    /// Single-character glyph used by text previews.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wood => 'w',
            Self::Food => 'f',
            Self::Gold => 'g',
            Self::Stone => 's',
            Self::Iron => 'i',
        }
    }
}

/// A harvestable deposit on one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Kind of resource
    pub resource_type: ResourceType,
    /// Tile X
    pub x: i32,
    /// Tile Y
    pub y: i32,
    /// Amount left
    pub amount: u32,
    /// Amount at placement
    pub original_amount: u32,
    /// Set once `amount` reaches zero
    pub depleted: bool,
}

impl ResourceNode {
    /// Creates a full node.
    #[must_use]
    pub const fn new(resource_type: ResourceType, coord: TileCoord, amount: u32) -> Self {
        Self {
            resource_type,
            x: coord.x,
            y: coord.y,
            amount,
            original_amount: amount,
            depleted: amount == 0,
        }
    }

    /// Tile the node sits on.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }

    /// Whether the node sits on `(x, y)`.
    #[must_use]
    pub const fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }

    /// Removes up to `requested` units, returning how many were taken.
    /// Flags the node depleted when it reaches zero.
    pub fn take(&mut self, requested: u32) -> u32 {
        let taken = requested.min(self.amount);
        self.amount -= taken;
        if self.amount == 0 {
            self.depleted = true;
        }
        taken
    }

    /// Restores `fraction` of the original amount (at least one unit) and
    /// clears the depleted flag.
    pub fn regrow(&mut self, fraction: f32) {
        let restored = (self.original_amount as f32 * fraction).round() as u32;
        self.amount = restored.max(1);
        self.depleted = false;
    }
}

/// Scatters resource clusters over a generated grid.
#[derive(Debug, Clone)]
pub struct ResourcePlacer {
    density: f64,
    rng: fastrand::Rng,
}

impl ResourcePlacer {
    /// Creates a placer. Density is clamped into `[0, 1]`; non-finite
    /// densities place nothing.
    #[must_use]
    pub fn new(density: f64, seed: u64) -> Self {
        let clamped = if density.is_finite() {
            density.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if (clamped - density).abs() > f64::EPSILON || !density.is_finite() {
            warn!("Resource density {density} out of range, using {clamped}");
        }

        Self {
            density: clamped,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Effective density.
    #[must_use]
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Global node target for `grid`.
    #[must_use]
    pub fn target_count(&self, grid: &TileGrid) -> usize {
        (grid.len() as f64 * self.density).floor() as usize
    }

    /// Places nodes on `grid`, marking their tiles unbuildable.
    ///
    /// Best effort: stops at the global target, and accepts falling short
    /// when compatible terrain runs out.
    pub fn place(&mut self, grid: &mut TileGrid) -> Vec<ResourceNode> {
        let target = self.target_count(grid);
        if grid.is_empty() || target == 0 {
            return Vec::new();
        }
        let mut occupied = vec![false; grid.len()];
        let mut nodes = Vec::with_capacity(target);

        for resource_type in ResourceType::ALL {
            let before = nodes.len();
            let per_type = target as f64 * resource_type.share();
            let attempts = (per_type / f64::from(resource_type.cluster_size())).ceil() as usize;

            for _ in 0..attempts {
                if nodes.len() >= target {
                    break;
                }
                let Some(center) = self.find_center(grid, &occupied, resource_type) else {
                    continue;
                };
                self.scatter_cluster(grid, &mut occupied, &mut nodes, center, resource_type, target);
            }

            debug!(
                "Placed {} {:?} nodes (type target {:.1}, {} attempts)",
                nodes.len() - before,
                resource_type,
                per_type,
                attempts
            );
        }

        info!("Placed {} of {} resource nodes", nodes.len(), target);
        nodes
    }

    fn find_center(
        &mut self,
        grid: &TileGrid,
        occupied: &[bool],
        resource_type: ResourceType,
    ) -> Option<TileCoord> {
        let width = grid.width() as i32;
        let height = grid.height() as i32;
        for _ in 0..CENTER_PROBES {
            let coord = TileCoord::new(self.rng.i32(0..width), self.rng.i32(0..height));
            if is_free_and_compatible(grid, occupied, coord, resource_type) {
                return Some(coord);
            }
        }
        None
    }

    fn scatter_cluster(
        &mut self,
        grid: &mut TileGrid,
        occupied: &mut [bool],
        nodes: &mut Vec<ResourceNode>,
        center: TileCoord,
        resource_type: ResourceType,
        target: usize,
    ) {
        let spread = self.rng.i32(-CLUSTER_SPREAD..=CLUSTER_SPREAD);
        let count = (resource_type.cluster_size() as i32 + spread).max(1);

        for _ in 0..count {
            if nodes.len() >= target {
                return;
            }
            for _ in 0..NODE_PROBES {
                let coord = center.offset(
                    self.rng.i32(-CLUSTER_SPREAD..=CLUSTER_SPREAD),
                    self.rng.i32(-CLUSTER_SPREAD..=CLUSTER_SPREAD),
                );
                if !is_free_and_compatible(grid, occupied, coord, resource_type) {
                    continue;
                }
                let Some(index) = grid.index_of(coord) else {
                    continue;
                };

                occupied[index] = true;
                if let Some(tile) = grid.get_mut(coord) {
                    tile.buildable = false;
                }
                let factor = 0.8 + self.rng.f32() * 0.4;
                let amount = (resource_type.base_amount() as f32 * factor).round() as u32;
                nodes.push(ResourceNode::new(resource_type, coord, amount));
                break;
            }
        }
    }
}

fn is_free_and_compatible(
    grid: &TileGrid,
    occupied: &[bool],
    coord: TileCoord,
    resource_type: ResourceType,
) -> bool {
    match (grid.index_of(coord), grid.get(coord)) {
        (Some(index), Some(tile)) => {
            !occupied[index] && resource_type.is_compatible(tile.terrain)
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainGenerator;
    use crate::tile::Tile;
    use std::collections::HashSet;

    fn plains(width: u32, height: u32) -> TileGrid {
        TileGrid::filled(width, height, Tile::new(TerrainType::Plains, 0.0, 0.0))
    }

    #[test]
    fn test_type_table() {
        let total: f64 = ResourceType::ALL.iter().map(|t| t.share()).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(ResourceType::Wood.is_compatible(TerrainType::Forest));
        assert!(!ResourceType::Food.is_compatible(TerrainType::Hills));
        assert!(ResourceType::Iron.is_compatible(TerrainType::Mountains));
        assert!(!ResourceType::Gold.is_compatible(TerrainType::Desert));
    }

    #[test]
    fn test_take_never_goes_negative() {
        let mut node = ResourceNode::new(ResourceType::Food, TileCoord::new(1, 1), 30);
        assert_eq!(node.take(20), 20);
        assert_eq!(node.amount, 10);
        assert!(!node.depleted);
        assert_eq!(node.take(50), 10);
        assert_eq!(node.amount, 0);
        assert!(node.depleted);
        assert_eq!(node.take(5), 0);
    }

    #[test]
    fn test_regrow_restores_fraction() {
        let mut node = ResourceNode::new(ResourceType::Wood, TileCoord::new(0, 0), 201);
        node.take(201);
        node.regrow(0.5);
        assert_eq!(node.amount, 101);
        assert!(!node.depleted);
    }

    #[test]
    fn test_placement_marks_tiles_unbuildable() {
        let mut grid = TerrainGenerator::with_seed(42).generate(64, 64);
        let nodes = ResourcePlacer::new(0.12, 43).place(&mut grid);
        assert!(!nodes.is_empty());

        let mut seen = HashSet::new();
        for node in &nodes {
            assert!(seen.insert(node.coord()), "two nodes on {}", node.coord());
            let tile = grid.get(node.coord()).expect("node in bounds");
            assert!(!tile.buildable);
            assert!(node.resource_type.is_compatible(tile.terrain));
            let base = node.resource_type.base_amount() as f32;
            assert!(node.amount as f32 >= (base * 0.8).floor());
            assert!(node.amount as f32 <= (base * 1.2).ceil());
        }
    }

    #[test]
    fn test_placement_respects_target() {
        let mut grid = plains(32, 32);
        let mut placer = ResourcePlacer::new(0.5, 1);
        let target = placer.target_count(&grid);
        let nodes = placer.place(&mut grid);
        assert!(nodes.len() <= target);
        // No high ground: only wood and food can be placed.
        assert!(nodes.iter().all(|n| !n.resource_type.is_mineral()));
    }

    #[test]
    fn test_placement_deterministic() {
        let mut a = TerrainGenerator::with_seed(5).generate(40, 40);
        let mut b = a.clone();
        let nodes_a = ResourcePlacer::new(0.1, 6).place(&mut a);
        let nodes_b = ResourcePlacer::new(0.1, 6).place(&mut b);
        assert_eq!(nodes_a, nodes_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_and_invalid_density_place_nothing() {
        let mut grid = plains(16, 16);
        assert!(ResourcePlacer::new(0.0, 1).place(&mut grid).is_empty());
        assert!(ResourcePlacer::new(f64::NAN, 1).place(&mut grid).is_empty());
        assert!((ResourcePlacer::new(3.0, 1).density() - 1.0).abs() < f64::EPSILON);
    }
}
