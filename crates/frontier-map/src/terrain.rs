//! Procedural terrain generation.
//!
//! Two independent [`ValueNoise`] channels (elevation and moisture) are
//! sampled per tile and classified into [`TerrainType`]s, then two starting
//! areas are carved into opposite corners. Generation never fails from the
//! caller's point of view: any error falls back to a deterministic
//! checkerboard map with the same starting areas.

use frontier_common::TileCoord;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{GenerationOptions, MAX_DIMENSION};
use crate::noise::ValueNoise;
use crate::tile::{TerrainType, Tile, TileGrid};

/// Radius of each carved starting area, in tiles.
pub const START_AREA_RADIUS: i32 = 10;

/// Fraction of [`START_AREA_RADIUS`] forced to open plains.
pub const START_AREA_INNER_FRACTION: f64 = 0.7;

/// Starting-area centers as fractions of the map size.
const START_AREA_ANCHORS: [f32; 2] = [0.15, 0.85];

/// Terrain generation errors. Never surfaced by [`TerrainGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Zero or oversized dimensions
    #[error("Invalid map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Option outside its valid range
    #[error("Invalid generation option {name}: {value}")]
    InvalidOption {
        /// Option name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Noise produced NaN or infinity
    #[error("Non-finite noise sample at ({x}, {y})")]
    NonFiniteSample {
        /// Tile X
        x: u32,
        /// Tile Y
        y: u32,
    },
}

/// Result type for terrain generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Seeded terrain generator.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    /// Generation options
    options: GenerationOptions,
    /// Elevation channel
    elevation: ValueNoise,
    /// Moisture channel
    moisture: ValueNoise,
}

impl TerrainGenerator {
    /// Creates a generator. Both noise tables are drawn from one RNG seeded
    /// with `options.seed`, elevation first.
    #[must_use]
    pub fn new(options: GenerationOptions) -> Self {
        let mut rng = fastrand::Rng::with_seed(options.seed);
        let elevation = ValueNoise::new(&mut rng);
        let moisture = ValueNoise::new(&mut rng);

        Self {
            options,
            elevation,
            moisture,
        }
    }

    /// Creates a generator with default options and the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(GenerationOptions {
            seed,
            ..GenerationOptions::default()
        })
    }

    /// Returns the generation options.
    #[must_use]
    pub const fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generates a `width × height` grid, falling back to
    /// [`TerrainGenerator::fallback`] on any error.
    #[must_use]
    pub fn generate(&self, width: u32, height: u32) -> TileGrid {
        self.generate_reporting(width, height).0
    }

    /// Like [`TerrainGenerator::generate`], also returning the error that
    /// triggered the fallback, if any.
    #[must_use]
    pub fn generate_reporting(&self, width: u32, height: u32) -> (TileGrid, Option<GenerationError>) {
        match self.try_generate(width, height) {
            Ok(grid) => {
                info!(
                    "Generated {}x{} terrain (seed {}): {} mountains, {} hills, {} forest",
                    width,
                    height,
                    self.options.seed,
                    grid.count(TerrainType::Mountains),
                    grid.count(TerrainType::Hills),
                    grid.count(TerrainType::Forest),
                );
                (grid, None)
            },
            Err(e) => {
                warn!("Terrain generation failed, using fallback map: {e}");
                (Self::fallback(width, height), Some(e))
            },
        }
    }

    /// Generates the noise-based grid, surfacing errors.
    pub fn try_generate(&self, width: u32, height: u32) -> GenerationResult<TileGrid> {
        validate_dimensions(width, height)?;
        let variation = self.options.terrain_variation;
        if !variation.is_finite() || variation <= 0.0 {
            return Err(GenerationError::InvalidOption {
                name: "terrain_variation",
                value: variation,
            });
        }

        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = self.sample_coords(x, y, width, height);
                let elevation = self.elevation.octaves(sx, sy, variation);
                let moisture = self.moisture.octaves(sx, sy, variation);
                if !elevation.is_finite() || !moisture.is_finite() {
                    return Err(GenerationError::NonFiniteSample { x, y });
                }

                let elevation = elevation as f32;
                let moisture = moisture as f32;
                tiles.push(Tile::new(
                    TerrainType::classify(elevation, moisture),
                    elevation,
                    moisture,
                ));
            }
        }

        let mut grid = TileGrid::from_tiles(width, height, tiles)
            .ok_or(GenerationError::InvalidDimensions { width, height })?;
        carve_starting_areas(&mut grid);
        Ok(grid)
    }

    /// Deterministic fallback: Plains/Desert checkerboard with carved
    /// starting areas. Dimensions are clamped into `1..=MAX_DIMENSION`.
    #[must_use]
    pub fn fallback(width: u32, height: u32) -> TileGrid {
        let width = width.clamp(1, MAX_DIMENSION);
        let height = height.clamp(1, MAX_DIMENSION);
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                let terrain = if (x + y) % 2 == 0 {
                    TerrainType::Plains
                } else {
                    TerrainType::Desert
                };
                Tile::new(terrain, 0.0, 0.0)
            })
            .collect();

        let mut grid = TileGrid::from_tiles(width, height, tiles)
            .unwrap_or_else(|| TileGrid::filled(width, height, Tile::new(TerrainType::Plains, 0.0, 0.0)));
        carve_starting_areas(&mut grid);
        debug!("Built {}x{} fallback terrain", width, height);
        grid
    }

    /// Centers of the two starting areas for a `width × height` map.
    #[must_use]
    pub fn starting_positions(width: u32, height: u32) -> [TileCoord; 2] {
        START_AREA_ANCHORS.map(|anchor| {
            TileCoord::new(
                (width as f32 * anchor) as i32,
                (height as f32 * anchor) as i32,
            )
        })
    }

    /// Noise sampling coordinates for tile `(x, y)`; folded about the center
    /// on both axes when symmetric.
    fn sample_coords(&self, x: u32, y: u32, width: u32, height: u32) -> (f64, f64) {
        if self.options.symmetric {
            (
                f64::from(x.min(width - 1 - x)),
                f64::from(y.min(height - 1 - y)),
            )
        } else {
            (f64::from(x), f64::from(y))
        }
    }
}

fn validate_dimensions(width: u32, height: u32) -> GenerationResult<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Carves both starting areas: the inner circle becomes buildable plains,
/// the outer ring turns mountains into hills and opens non-forest tiles for
/// building.
pub fn carve_starting_areas(grid: &mut TileGrid) {
    let radius = START_AREA_RADIUS;
    let inner = f64::from(radius) * START_AREA_INNER_FRACTION;
    let inner_sq = inner * inner;
    let outer_sq = f64::from(radius * radius);

    for center in TerrainGenerator::starting_positions(grid.width(), grid.height()) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let coord = center.offset(dx, dy);
                let Some(tile) = grid.get_mut(coord) else {
                    continue;
                };
                let dist_sq = coord.distance_squared(center) as f64;
                if dist_sq <= inner_sq {
                    tile.set_terrain(TerrainType::Plains);
                    tile.buildable = true;
                } else if dist_sq <= outer_sq {
                    if tile.terrain == TerrainType::Mountains {
                        tile.set_terrain(TerrainType::Hills);
                    }
                    tile.buildable = tile.terrain != TerrainType::Forest;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn options(seed: u64) -> GenerationOptions {
        GenerationOptions {
            seed,
            ..GenerationOptions::default()
        }
    }

    #[test]
    fn test_generation_deterministic() {
        let a = TerrainGenerator::with_seed(42).generate(64, 64);
        let b = TerrainGenerator::with_seed(42).generate(64, 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_different_terrain() {
        let a = TerrainGenerator::with_seed(42).generate(48, 48);
        let b = TerrainGenerator::with_seed(999).generate(48, 48);
        assert_ne!(a, b);
    }

    #[test]
    fn test_default_options_produce_varied_terrain() {
        let grid = TerrainGenerator::with_seed(42).generate(64, 64);
        assert!(grid.count(TerrainType::Plains) > 0);
        assert!(grid.count(TerrainType::Hills) + grid.count(TerrainType::Mountains) > 0);
    }

    #[test]
    fn test_starting_areas_are_open() {
        let grid = TerrainGenerator::with_seed(7).generate(64, 64);
        for center in TerrainGenerator::starting_positions(64, 64) {
            for dy in -7..=7 {
                for dx in -7..=7 {
                    if dx * dx + dy * dy > 49 {
                        continue;
                    }
                    let tile = grid.get(center.offset(dx, dy)).expect("inner circle in bounds");
                    assert_eq!(tile.terrain, TerrainType::Plains);
                    assert!(tile.passable && tile.buildable);
                }
            }
            for dy in -10..=10 {
                for dx in -10..=10 {
                    if let Some(tile) = grid.get(center.offset(dx, dy)) {
                        if dx * dx + dy * dy <= 100 {
                            assert_ne!(tile.terrain, TerrainType::Mountains);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_starting_positions() {
        assert_eq!(
            TerrainGenerator::starting_positions(64, 64),
            [TileCoord::new(9, 9), TileCoord::new(54, 54)]
        );
    }

    #[test]
    fn test_invalid_dimensions_fall_back() {
        let generator = TerrainGenerator::with_seed(1);
        assert_eq!(
            generator.try_generate(0, 10),
            Err(GenerationError::InvalidDimensions { width: 0, height: 10 })
        );

        let (grid, err) = generator.generate_reporting(0, 10);
        assert!(err.is_some());
        assert_eq!((grid.width(), grid.height()), (1, 10));
    }

    #[test]
    fn test_invalid_variation_falls_back_deterministically() {
        let generator = TerrainGenerator::new(GenerationOptions {
            terrain_variation: f64::NAN,
            ..options(3)
        });
        let (grid, err) = generator.generate_reporting(32, 32);
        assert!(matches!(err, Some(GenerationError::InvalidOption { .. })));
        assert_eq!(grid, TerrainGenerator::fallback(32, 32));
    }

    #[test]
    fn test_fallback_checkerboard() {
        let grid = TerrainGenerator::fallback(40, 40);
        // Far from both starting areas.
        let far = grid.get(TileCoord::new(30, 2)).expect("in bounds");
        let next = grid.get(TileCoord::new(31, 2)).expect("in bounds");
        assert_eq!(far.terrain, TerrainType::Plains);
        assert_eq!(next.terrain, TerrainType::Desert);
        assert_eq!(grid.count(TerrainType::Mountains), 0);
        assert!(grid.tiles().iter().all(|t| t.passable));
    }

    #[test]
    fn test_symmetric_terrain_mirrors_about_center() {
        let generator = TerrainGenerator::new(GenerationOptions {
            symmetric: true,
            ..options(11)
        });
        let grid = generator.generate(50, 40);
        for (coord, tile) in grid.iter() {
            let mirror = TileCoord::new(49 - coord.x, 39 - coord.y);
            let other = grid.get(mirror).expect("mirror in bounds");
            assert_eq!(tile.elevation.to_bits(), other.elevation.to_bits());
            assert_eq!(tile.moisture.to_bits(), other.moisture.to_bits());
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_mountains_never_passable(seed in any::<u64>(), w in 1u32..48, h in 1u32..48) {
            let grid = TerrainGenerator::with_seed(seed).generate(w, h);
            prop_assert_eq!(grid.len(), (w * h) as usize);
            for tile in grid.tiles() {
                if tile.terrain == TerrainType::Mountains {
                    prop_assert!(!tile.passable);
                }
                if tile.buildable {
                    prop_assert!(tile.terrain != TerrainType::Mountains);
                }
            }
        }
    }
}
