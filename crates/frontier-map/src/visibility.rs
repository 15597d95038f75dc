//! Fog of war.
//!
//! Each tile is in one of three states. Every update first demotes all
//! `Visible` tiles to `Explored`, then marks everything inside an observer's
//! circle `Visible`. `Unexplored` is never re-entered.

use ahash::AHashMap;
use frontier_common::{FactionId, TileCoord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-tile fog state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FogState {
    /// Never seen
    #[default]
    Unexplored,
    /// Seen before, not currently in sight
    Explored,
    /// In sight of an observer this update
    Visible,
}

/// A unit or building that reveals tiles around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Tile the observer stands on
    pub position: TileCoord,
    /// Euclidean sight radius in tiles
    pub view_range: f32,
}

impl Observer {
    /// Creates an observer.
    #[must_use]
    pub const fn new(position: TileCoord, view_range: f32) -> Self {
        Self {
            position,
            view_range,
        }
    }
}

/// Fog-of-war grid for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityTracker {
    width: u32,
    height: u32,
    states: Vec<FogState>,
}

impl VisibilityTracker {
    /// Creates a fully unexplored tracker.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            states: vec![FogState::Unexplored; width as usize * height as usize],
        }
    }

    /// Tracker width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Tracker height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Recomputes visibility with every position sharing one view range.
    pub fn update_visibility(&mut self, positions: &[TileCoord], view_range: f32) {
        self.demote();
        for &position in positions {
            self.reveal(position, view_range);
        }
    }

    /// Recomputes visibility from observers with individual ranges.
    pub fn update_observers(&mut self, observers: &[Observer]) {
        self.demote();
        for observer in observers {
            self.reveal(observer.position, observer.view_range);
        }
    }

    /// Fog state at `(x, y)`; out-of-bounds tiles read as unexplored.
    #[must_use]
    pub fn state(&self, x: i32, y: i32) -> FogState {
        TileCoord::new(x, y)
            .to_index(self.width, self.height)
            .map_or(FogState::Unexplored, |i| self.states[i])
    }

    /// Whether `(x, y)` is currently in sight.
    #[must_use]
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.state(x, y) == FogState::Visible
    }

    /// Whether `(x, y)` has ever been seen. Currently visible tiles count.
    #[must_use]
    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.state(x, y) != FogState::Unexplored
    }

    /// Number of tiles currently visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.states
            .iter()
            .filter(|&&s| s == FogState::Visible)
            .count()
    }

    /// Number of tiles ever seen, including visible ones.
    #[must_use]
    pub fn explored_count(&self) -> usize {
        self.states
            .iter()
            .filter(|&&s| s != FogState::Unexplored)
            .count()
    }

    /// Raw row-major fog states.
    #[must_use]
    pub fn states(&self) -> &[FogState] {
        &self.states
    }

    fn demote(&mut self) {
        for state in &mut self.states {
            if *state == FogState::Visible {
                *state = FogState::Explored;
            }
        }
    }

    /// Marks tiles with squared distance `<= range²` visible, clipped to the map.
    fn reveal(&mut self, center: TileCoord, range: f32) {
        if !range.is_finite() || range < 0.0 || self.states.is_empty() {
            return;
        }
        let range = f64::from(range);
        let range_sq = range * range;
        let reach = range.floor() as i64;

        let max_x = i64::from(self.width) - 1;
        let max_y = i64::from(self.height) - 1;
        let cx = i64::from(center.x);
        let cy = i64::from(center.y);
        let x0 = cx.saturating_sub(reach).max(0);
        let x1 = cx.saturating_add(reach).min(max_x);
        let y0 = cy.saturating_sub(reach).max(0);
        let y1 = cy.saturating_add(reach).min(max_y);

        for y in y0..=y1 {
            let dy = (y - cy) as f64;
            let row = y as usize * self.width as usize;
            for x in x0..=x1 {
                let dx = (x - cx) as f64;
                if dx * dx + dy * dy <= range_sq {
                    self.states[row + x as usize] = FogState::Visible;
                }
            }
        }
    }
}

/// Whether factions see through a shared fog or keep their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FogSharing {
    /// One fog grid for every viewer
    #[default]
    Shared,
    /// One fog grid per faction
    PerFaction,
}

/// Fog of war for every faction on a map.
///
/// In [`FogSharing::Shared`] mode all faction arguments resolve to the same
/// tracker; in [`FogSharing::PerFaction`] mode trackers are created on first
/// update and a faction that has never updated has explored nothing.
#[derive(Debug, Clone)]
pub struct FogOfWar {
    width: u32,
    height: u32,
    sharing: FogSharing,
    shared: VisibilityTracker,
    factions: AHashMap<FactionId, VisibilityTracker>,
}

impl FogOfWar {
    /// Creates an all-unexplored fog.
    #[must_use]
    pub fn new(width: u32, height: u32, sharing: FogSharing) -> Self {
        Self {
            width,
            height,
            sharing,
            shared: VisibilityTracker::new(width, height),
            factions: AHashMap::new(),
        }
    }

    /// Sharing mode.
    #[must_use]
    pub const fn sharing(&self) -> FogSharing {
        self.sharing
    }

    /// The shared tracker. In per-faction mode this is the view of
    /// [`FactionId::PLAYER`].
    #[must_use]
    pub fn shared(&self) -> &VisibilityTracker {
        match self.sharing {
            FogSharing::Shared => &self.shared,
            FogSharing::PerFaction => self
                .factions
                .get(&FactionId::PLAYER)
                .unwrap_or(&self.shared),
        }
    }

    /// Tracker a faction reads from, if it has one yet.
    #[must_use]
    pub fn tracker(&self, faction: FactionId) -> Option<&VisibilityTracker> {
        match self.sharing {
            FogSharing::Shared => Some(&self.shared),
            FogSharing::PerFaction => self.factions.get(&faction),
        }
    }

    /// Recomputes one faction's fog from its observers.
    pub fn update(&mut self, faction: FactionId, observers: &[Observer]) {
        let tracker = match self.sharing {
            FogSharing::Shared => &mut self.shared,
            FogSharing::PerFaction => {
                let (width, height) = (self.width, self.height);
                self.factions.entry(faction).or_insert_with(|| {
                    debug!("Created fog tracker for {}", faction);
                    VisibilityTracker::new(width, height)
                })
            },
        };
        tracker.update_observers(observers);
    }

    /// Whether `(x, y)` is currently visible to `faction`.
    #[must_use]
    pub fn is_visible(&self, faction: FactionId, x: i32, y: i32) -> bool {
        self.tracker(faction).is_some_and(|t| t.is_visible(x, y))
    }

    /// Whether `faction` has ever seen `(x, y)`.
    #[must_use]
    pub fn is_explored(&self, faction: FactionId, x: i32, y: i32) -> bool {
        self.tracker(faction).is_some_and(|t| t.is_explored(x, y))
    }

    /// Factions with their own tracker, in id order.
    #[must_use]
    pub fn factions(&self) -> Vec<FactionId> {
        let mut ids: Vec<_> = self.factions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
