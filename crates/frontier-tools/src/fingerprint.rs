//! Stable map hashes for determinism checks.
//!
//! FNV-1a over a fixed little-endian encoding, so the value is identical
//! across platforms, runs and builds. Fog state is not hashed.

use frontier_map::{GameMap, MapSnapshot, ResourceNode, ResourceType, TerrainType, Tile};

/// 64-bit FNV-1a hasher.
#[derive(Debug, Clone)]
pub struct Fnv1a64 {
    hash: u64,
}

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    /// Creates a hasher at the offset basis.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            hash: Self::OFFSET_BASIS,
        }
    }

    /// Feeds raw bytes.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u64::from(b);
            self.hash = self.hash.wrapping_mul(Self::PRIME);
        }
    }

    fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Current hash value.
    #[must_use]
    pub const fn finish(&self) -> u64 {
        self.hash
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

fn terrain_tag(terrain: TerrainType) -> u8 {
    match terrain {
        TerrainType::Plains => 0,
        TerrainType::Forest => 1,
        TerrainType::Mountains => 2,
        TerrainType::Hills => 3,
        TerrainType::Desert => 4,
    }
}

fn resource_tag(resource_type: ResourceType) -> u8 {
    match resource_type {
        ResourceType::Wood => 0,
        ResourceType::Food => 1,
        ResourceType::Gold => 2,
        ResourceType::Stone => 3,
        ResourceType::Iron => 4,
    }
}

fn hash_parts(width: u32, height: u32, tiles: &[Tile], resources: &[ResourceNode]) -> u64 {
    let mut h = Fnv1a64::new();
    h.write_u32(width);
    h.write_u32(height);
    for tile in tiles {
        h.write_u8(terrain_tag(tile.terrain));
        h.write_u32(tile.elevation.to_bits());
        h.write_u32(tile.moisture.to_bits());
        h.write_bool(tile.passable);
        h.write_bool(tile.buildable);
    }
    h.write_u64(resources.len() as u64);
    for node in resources {
        h.write_u8(resource_tag(node.resource_type));
        h.write_i32(node.x);
        h.write_i32(node.y);
        h.write_u32(node.amount);
        h.write_u32(node.original_amount);
        h.write_bool(node.depleted);
    }
    h.finish()
}

/// Hash of a live map's terrain and resources.
#[must_use]
pub fn map_fingerprint(map: &GameMap) -> u64 {
    hash_parts(
        map.width(),
        map.height(),
        map.tiles().tiles(),
        map.resources(),
    )
}

/// Hash of a snapshot. Equals [`map_fingerprint`] of the map it was taken from.
#[must_use]
pub fn snapshot_fingerprint(snapshot: &MapSnapshot) -> u64 {
    hash_parts(
        snapshot.width,
        snapshot.height,
        &snapshot.tiles,
        &snapshot.resources,
    )
}
