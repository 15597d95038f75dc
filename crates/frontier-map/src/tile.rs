//! Tiles and the row-major tile grid.

use frontier_common::TileCoord;
use serde::{Deserialize, Serialize};

/// Terrain classification of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    /// Open ground
    Plains,
    /// Woodland, walkable but not buildable
    Forest,
    /// Impassable peaks
    Mountains,
    /// Raised, walkable ground
    Hills,
    /// Dry, walkable ground
    Desert,
}

impl TerrainType {
    /// All terrain types.
    pub const ALL: [Self; 5] = [
        Self::Plains,
        Self::Forest,
        Self::Mountains,
        Self::Hills,
        Self::Desert,
    ];

    /// Classifies a noise sample.
    #[must_use]
    pub fn classify(elevation: f32, moisture: f32) -> Self {
        if elevation > 0.6 {
            Self::Mountains
        } else if elevation > 0.4 {
            Self::Hills
        } else if moisture > 0.6 {
            Self::Forest
        } else if moisture < -0.4 {
            Self::Desert
        } else {
            Self::Plains
        }
    }

    /// Whether units can walk over this terrain.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Mountains)
    }

    /// Whether buildings can be placed on this terrain by default.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        !matches!(self, Self::Mountains | Self::Forest)
    }

    /// Single-character glyph used by text previews.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Plains => '.',
            Self::Forest => 'T',
            Self::Mountains => '^',
            Self::Hills => 'n',
            Self::Desert => '~',
        }
    }
}

/// One cell of the terrain grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Terrain classification
    pub terrain: TerrainType,
    /// Elevation sample in [-1, 1]
    pub elevation: f32,
    /// Moisture sample in [-1, 1]
    pub moisture: f32,
    /// Units can walk here
    pub passable: bool,
    /// Buildings can be placed here
    pub buildable: bool,
}

impl Tile {
    /// Creates a tile with flags derived from its terrain.
    #[must_use]
    pub const fn new(terrain: TerrainType, elevation: f32, moisture: f32) -> Self {
        Self {
            terrain,
            elevation,
            moisture,
            passable: terrain.is_passable(),
            buildable: terrain.is_buildable(),
        }
    }

    /// Replaces the terrain and re-derives both flags from it.
    pub fn set_terrain(&mut self, terrain: TerrainType) {
        self.terrain = terrain;
        self.passable = terrain.is_passable();
        self.buildable = terrain.is_buildable();
    }
}

/// Fixed-size, row-major grid of tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid with every cell set to `tile`.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile; width as usize * height as usize],
        }
    }

    /// Wraps an existing row-major tile vector. Returns `None` if the length
    /// does not equal `width * height`.
    #[must_use]
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Option<Self> {
        (tiles.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            tiles,
        })
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the grid has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `coord` lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.in_bounds(self.width, self.height)
    }

    /// Row-major index of `coord`, if in bounds.
    #[must_use]
    pub const fn index_of(&self, coord: TileCoord) -> Option<usize> {
        coord.to_index(self.width, self.height)
    }

    /// Tile at `coord`, or `None` out of bounds.
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    /// Mutable tile at `coord`, or `None` out of bounds.
    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.index_of(coord).map(|i| &mut self.tiles[i])
    }

    /// All tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterates `(coord, tile)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (TileCoord::from_index(i, width), tile))
    }

    /// Number of tiles with the given terrain.
    #[must_use]
    pub fn count(&self, terrain: TerrainType) -> usize {
        self.tiles.iter().filter(|t| t.terrain == terrain).count()
    }

    /// Consumes the grid, returning its tiles.
    #[must_use]
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(TerrainType::classify(0.61, 0.0), TerrainType::Mountains);
        assert_eq!(TerrainType::classify(0.6, 0.0), TerrainType::Hills);
        assert_eq!(TerrainType::classify(0.41, 0.9), TerrainType::Hills);
        assert_eq!(TerrainType::classify(0.4, 0.61), TerrainType::Forest);
        assert_eq!(TerrainType::classify(0.0, -0.41), TerrainType::Desert);
        assert_eq!(TerrainType::classify(0.0, -0.4), TerrainType::Plains);
    }

    #[test]
    fn test_flags_follow_terrain() {
        let mountain = Tile::new(TerrainType::Mountains, 0.9, 0.0);
        assert!(!mountain.passable && !mountain.buildable);
        let forest = Tile::new(TerrainType::Forest, 0.0, 0.8);
        assert!(forest.passable && !forest.buildable);

        let mut tile = mountain;
        tile.set_terrain(TerrainType::Hills);
        assert!(tile.passable && tile.buildable);
    }

    #[test]
    fn test_grid_access() {
        let mut grid = TileGrid::filled(4, 3, Tile::new(TerrainType::Plains, 0.0, 0.0));
        assert_eq!(grid.len(), 12);
        assert!(grid.get(TileCoord::new(4, 0)).is_none());
        assert!(grid.get(TileCoord::new(-1, 0)).is_none());

        let coord = TileCoord::new(3, 2);
        if let Some(tile) = grid.get_mut(coord) {
            tile.set_terrain(TerrainType::Desert);
        }
        assert_eq!(grid.count(TerrainType::Desert), 1);
        let (found, _) = grid
            .iter()
            .find(|(_, t)| t.terrain == TerrainType::Desert)
            .expect("desert tile");
        assert_eq!(found, coord);
    }

    #[test]
    fn test_from_tiles_checks_length() {
        let tile = Tile::new(TerrainType::Plains, 0.0, 0.0);
        assert!(TileGrid::from_tiles(2, 2, vec![tile; 4]).is_some());
        assert!(TileGrid::from_tiles(2, 2, vec![tile; 3]).is_none());
    }
}
