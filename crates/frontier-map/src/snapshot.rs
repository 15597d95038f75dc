//! Serializable map state for save systems.
//!
//! Only terrain and resources are stored. Passability and fog are derived
//! data and are rebuilt on restore.

use frontier_common::{SchemaVersion, SnapshotError, TileCoord};
use serde::{Deserialize, Serialize};

use crate::config::MAX_DIMENSION;
use crate::resources::ResourceNode;
use crate::tile::Tile;

/// Persistable map contents. Encoding is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    /// Schema version the snapshot was written with
    pub version: SchemaVersion,
    /// Seed the map was generated from
    pub seed: u64,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Row-major tiles
    pub tiles: Vec<Tile>,
    /// Resource nodes, in placement order
    pub resources: Vec<ResourceNode>,
}

impl MapSnapshot {
    /// Checks that this build can restore the snapshot.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        SchemaVersion::MAP_SNAPSHOT.ensure_readable(&self.version)?;

        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(SnapshotError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let expected = self.width as usize * self.height as usize;
        if self.tiles.len() != expected {
            return Err(SnapshotError::TileCountMismatch {
                expected,
                actual: self.tiles.len(),
            });
        }

        if let Some(node) = self
            .resources
            .iter()
            .find(|n| !TileCoord::new(n.x, n.y).in_bounds(self.width, self.height))
        {
            return Err(SnapshotError::ResourceOutOfBounds {
                x: node.x,
                y: node.y,
            });
        }

        Ok(())
    }
}
