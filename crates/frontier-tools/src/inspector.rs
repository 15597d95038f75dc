//! Map and tile inspection tools.

use std::fmt;

use frontier_common::TileCoord;
use frontier_map::{GameMap, ResourceNode, ResourceType, TerrainType, Tile, TileGrid};

/// Tile inspection data.
#[derive(Debug, Clone, PartialEq)]
pub struct TileInfo {
    /// Tile coordinate
    pub coord: TileCoord,
    /// Tile data
    pub tile: Tile,
    /// Resource node on the tile, if any
    pub resource: Option<ResourceNode>,
    /// Currently visible in the shared fog
    pub visible: bool,
    /// Explored in the shared fog
    pub explored: bool,
}

/// Collects everything known about one tile.
#[must_use]
pub fn inspect_tile(map: &GameMap, coord: TileCoord) -> Option<TileInfo> {
    let tile = *map.tile(coord.x, coord.y)?;
    Some(TileInfo {
        coord,
        tile,
        resource: map.resource_at(coord.x, coord.y).cloned(),
        visible: map.is_visible(coord.x, coord.y),
        explored: map.is_explored(coord.x, coord.y),
    })
}

/// Per-type resource totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSummary {
    /// Resource type
    pub resource_type: ResourceType,
    /// Nodes of this type
    pub nodes: usize,
    /// Nodes that are depleted
    pub depleted: usize,
    /// Units left across all nodes
    pub remaining: u64,
}

/// Terrain histogram in [`TerrainType::ALL`] order.
#[must_use]
pub fn terrain_histogram(grid: &TileGrid) -> Vec<(TerrainType, usize)> {
    let mut counts = [0usize; TerrainType::ALL.len()];
    for tile in grid.tiles() {
        if let Some(slot) = TerrainType::ALL.iter().position(|&t| t == tile.terrain) {
            counts[slot] += 1;
        }
    }
    TerrainType::ALL.into_iter().zip(counts).collect()
}

/// Resource totals in [`ResourceType::ALL`] order.
#[must_use]
pub fn resource_summary(resources: &[ResourceNode]) -> Vec<ResourceSummary> {
    ResourceType::ALL
        .into_iter()
        .map(|resource_type| {
            let of_type = resources.iter().filter(|n| n.resource_type == resource_type);
            let mut summary = ResourceSummary {
                resource_type,
                nodes: 0,
                depleted: 0,
                remaining: 0,
            };
            for node in of_type {
                summary.nodes += 1;
                summary.depleted += usize::from(node.depleted);
                summary.remaining += u64::from(node.amount);
            }
            summary
        })
        .collect()
}

/// Whole-map statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MapReport {
    /// Map width
    pub width: u32,
    /// Map height
    pub height: u32,
    /// Generation seed
    pub seed: u64,
    /// Terrain came from the fallback generator
    pub used_fallback: bool,
    /// Tiles per terrain type
    pub terrain: Vec<(TerrainType, usize)>,
    /// Tiles units can walk on
    pub passable: usize,
    /// Tiles buildings can be placed on
    pub buildable: usize,
    /// Per-type resource totals
    pub resources: Vec<ResourceSummary>,
    /// Starting area centers
    pub starting_positions: [TileCoord; 2],
}

impl MapReport {
    /// Builds a report for `map`.
    #[must_use]
    pub fn build(map: &GameMap) -> Self {
        let tiles = map.tiles().tiles();
        Self {
            width: map.width(),
            height: map.height(),
            seed: map.config().seed(),
            used_fallback: map.used_fallback(),
            terrain: terrain_histogram(map.tiles()),
            passable: tiles.iter().filter(|t| t.passable).count(),
            buildable: tiles.iter().filter(|t| t.buildable).count(),
            resources: resource_summary(map.resources()),
            starting_positions: map.starting_positions(),
        }
    }

    /// Total resource nodes.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.iter().map(|s| s.nodes).sum()
    }
}

impl fmt::Display for MapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Map {}x{} (seed {}){}",
            self.width,
            self.height,
            self.seed,
            if self.used_fallback { " [fallback]" } else { "" }
        )?;
        let [a, b] = self.starting_positions;
        writeln!(f, "  starts: {a} {b}")?;
        writeln!(
            f,
            "  passable: {}  buildable: {}",
            self.passable, self.buildable
        )?;
        for (terrain, count) in &self.terrain {
            writeln!(f, "  {terrain:?}: {count}")?;
        }
        writeln!(f, "  resources: {}", self.resource_count())?;
        for s in &self.resources {
            writeln!(
                f,
                "    {:?}: {} nodes, {} depleted, {} units",
                s.resource_type, s.nodes, s.depleted, s.remaining
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_map::MapConfig;

    #[test]
    fn test_histogram_covers_grid() {
        let map = GameMap::generate(MapConfig::new(40, 30, 3));
        let histogram = terrain_histogram(map.tiles());
        assert_eq!(histogram.len(), TerrainType::ALL.len());
        let total: usize = histogram.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 1200);
        let mountains = histogram
            .iter()
            .find(|(t, _)| *t == TerrainType::Mountains)
            .map(|(_, c)| *c);
        assert_eq!(mountains, Some(map.tiles().count(TerrainType::Mountains)));
    }

    #[test]
    fn test_resource_summary_tracks_depletion() {
        let mut map = GameMap::generate(MapConfig::new(40, 30, 3));
        let first = map.resources()[0].clone();
        map.gather_resource(first.x, first.y, u32::MAX)
            .expect("gather");

        let report = MapReport::build(&map);
        assert_eq!(report.resource_count(), map.resources().len());
        let row = report
            .resources
            .iter()
            .find(|s| s.resource_type == first.resource_type)
            .expect("summary row");
        assert_eq!(row.depleted, 1);
        assert!(report
            .to_string()
            .contains(&format!("{:?}:", first.resource_type)));
    }

    #[test]
    fn test_inspect_tile() {
        let mut map = GameMap::generate(MapConfig::new(32, 32, 9));
        let node = map.resources()[0].clone();
        map.update_visibility(&[node.coord()], 2.0);

        let info = inspect_tile(&map, node.coord()).expect("in bounds");
        assert_eq!(info.resource.as_ref(), Some(&node));
        assert!(info.visible && info.explored);
        assert!(!info.tile.buildable);
        assert!(inspect_tile(&map, TileCoord::new(32, 0)).is_none());
    }
}
