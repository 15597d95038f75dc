//! ASCII map preview.
//!
//! One character per tile, one line per row. Fog hides unexplored tiles and
//! keeps resources of explored-but-not-visible tiles hidden.

use frontier_common::{FactionId, TileCoord};
use frontier_map::GameMap;

/// Glyph for tiles nobody has explored.
pub const UNEXPLORED_GLYPH: char = ' ';

/// Glyph for path overlay cells.
pub const PATH_GLYPH: char = '*';

/// Glyph for starting area centers.
pub const START_GLYPH: char = 'S';

/// What to draw on top of terrain.
#[derive(Debug, Clone, Default)]
pub struct PreviewOptions {
    /// Draw resource glyphs
    pub show_resources: bool,
    /// Render through this faction's fog
    pub fog: Option<FactionId>,
    /// Path to overlay
    pub path: Vec<TileCoord>,
    /// Mark starting area centers
    pub show_starts: bool,
}

/// Renders `map` to a newline-separated string.
#[must_use]
pub fn render_ascii(map: &GameMap, options: &PreviewOptions) -> String {
    let width = map.width();
    let height = map.height();
    let mut cells: Vec<char> = map.tiles().tiles().iter().map(|t| t.terrain.glyph()).collect();

    if options.show_resources {
        for node in map.resources() {
            if node.depleted {
                continue;
            }
            if let Some(i) = node.coord().to_index(width, height) {
                cells[i] = node.resource_type.glyph();
            }
        }
    }

    if let Some(faction) = options.fog {
        for (i, cell) in cells.iter_mut().enumerate() {
            let c = TileCoord::from_index(i, width);
            if !map.is_explored_by(faction, c.x, c.y) {
                *cell = UNEXPLORED_GLYPH;
            } else if !map.is_visible_to(faction, c.x, c.y) {
                if let Some(tile) = map.tile(c.x, c.y) {
                    *cell = tile.terrain.glyph();
                }
            }
        }
    }

    if options.show_starts {
        for start in map.starting_positions() {
            if let Some(i) = start.to_index(width, height) {
                cells[i] = START_GLYPH;
            }
        }
    }

    for step in &options.path {
        if let Some(i) = step.to_index(width, height) {
            cells[i] = PATH_GLYPH;
        }
    }

    let mut out = String::with_capacity(cells.len() + height as usize);
    for row in cells.chunks(width.max(1) as usize) {
        out.extend(row);
        out.push('\n');
    }
    out
}
