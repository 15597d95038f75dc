//! Passability grid and A* pathfinding.
//!
//! Movement is 8-connected with a uniform step cost of 1 in every direction,
//! and the heuristic is Chebyshev distance. That heuristic is admissible only
//! because diagonal and orthogonal steps cost the same; switching to a
//! weighted diagonal cost (e.g. √2) requires switching the heuristic to
//! octile distance.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use frontier_common::TileCoord;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::PathfindingConfig;
use crate::tile::TileGrid;

/// Bit-packed passability matrix, one bit per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassabilityGrid {
    width: u32,
    height: u32,
    bits: Vec<u64>,
}

impl PassabilityGrid {
    /// Grid with every tile passable.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let mut bits = vec![u64::MAX; len.div_ceil(64)];
        let tail = len % 64;
        if tail != 0 {
            if let Some(last) = bits.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Derives the grid from tile `passable` flags.
    #[must_use]
    pub fn from_tiles(grid: &TileGrid) -> Self {
        let len = grid.len();
        let mut bits = vec![0u64; len.div_ceil(64)];
        for (i, tile) in grid.tiles().iter().enumerate() {
            if tile.passable {
                bits[i / 64] |= 1 << (i % 64);
            }
        }
        Self {
            width: grid.width(),
            height: grid.height(),
            bits,
        }
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

    /// Whether `coord` lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.in_bounds(self.width, self.height)
    }

    /// Whether `coord` is on the grid and passable.
    #[must_use]
    pub fn is_passable(&self, coord: TileCoord) -> bool {
        coord
            .to_index(self.width, self.height)
            .is_some_and(|i| self.bit(i))
    }

    /// Sets a tile's passability. Returns `false` if `coord` is off the grid.
    pub fn set_passable(&mut self, coord: TileCoord, passable: bool) -> bool {
        let Some(i) = coord.to_index(self.width, self.height) else {
            return false;
        };
        if passable {
            self.bits[i / 64] |= 1 << (i % 64);
        } else {
            self.bits[i / 64] &= !(1 << (i % 64));
        }
        true
    }

    /// Number of passable tiles.
    #[must_use]
    pub fn passable_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn bit(&self, index: usize) -> bool {
        self.bits[index / 64] & (1 << (index % 64)) != 0
    }
}

/// Why no path was returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Start lies outside the map
    #[error("Path start {0} is out of bounds")]
    StartOutOfBounds(TileCoord),

    /// Goal lies outside the map
    #[error("Path goal {0} is out of bounds")]
    GoalOutOfBounds(TileCoord),

    /// Goal is blocked and no passable tile lies within the search radius
    #[error("No passable tile within {radius} steps of goal {goal}")]
    NoPassableGoal {
        /// Requested goal
        goal: TileCoord,
        /// BFS bound used
        radius: u32,
    },

    /// Goal cannot be reached from start
    #[error("No route from {start} to {goal}")]
    Unreachable {
        /// Start tile
        start: TileCoord,
        /// Goal tile (after redirection)
        goal: TileCoord,
    },
}

/// Path from start to goal inclusive, or the reason there is none.
pub type PathResult = Result<Vec<TileCoord>, PathError>;

/// Open-set entry. Ordered so that `BinaryHeap` pops the lowest `f`, then
/// the lowest `h`, then the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    h: u32,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Path query handle over an immutable passability snapshot.
///
/// Cheap to clone and safe to send to worker threads; edits made to the map
/// after the snapshot was taken are not observed.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: Arc<PassabilityGrid>,
    config: PathfindingConfig,
}

impl Pathfinder {
    /// Creates a pathfinder over `grid`.
    #[must_use]
    pub fn new(grid: Arc<PassabilityGrid>, config: PathfindingConfig) -> Self {
        Self { grid, config }
    }

    /// Passability snapshot this pathfinder searches.
    #[must_use]
    pub fn grid(&self) -> &PassabilityGrid {
        &self.grid
    }

    /// Finds a shortest path from `start` to `goal`, both inclusive.
    ///
    /// A blocked goal is redirected to the nearest passable tile found by a
    /// bounded 4-connected BFS. The start tile itself need not be passable.
    pub fn find_path(&self, start: TileCoord, goal: TileCoord) -> PathResult {
        if !self.grid.in_bounds(start) {
            return Err(PathError::StartOutOfBounds(start));
        }
        if !self.grid.in_bounds(goal) {
            return Err(PathError::GoalOutOfBounds(goal));
        }

        let target = if self.grid.is_passable(goal) {
            goal
        } else {
            let radius = self.config.goal_search_radius;
            let redirected = self
                .nearest_passable(goal, radius)
                .ok_or(PathError::NoPassableGoal { goal, radius })?;
            trace!("Redirected blocked goal {} to {}", goal, redirected);
            redirected
        };

        if start == target {
            return Ok(vec![start]);
        }

        self.search(start, target)
            .ok_or(PathError::Unreachable { start, goal: target })
    }

    /// Nearest passable tile to `origin` within `radius` 4-connected steps,
    /// in BFS order. Returns `origin` itself if it is passable.
    #[must_use]
    pub fn nearest_passable(&self, origin: TileCoord, radius: u32) -> Option<TileCoord> {
        if self.grid.is_passable(origin) {
            return Some(origin);
        }
        let width = self.grid.width;
        let height = self.grid.height;
        let origin_index = origin.to_index(width, height)?;

        let mut visited = AHashSet::new();
        visited.insert(origin_index);
        let mut queue = VecDeque::from([(origin, 0u32)]);

        while let Some((coord, depth)) = queue.pop_front() {
            if depth >= radius {
                continue;
            }
            for (dx, dy) in TileCoord::NEIGHBORS_4 {
                let next = coord.offset(dx, dy);
                let Some(i) = next.to_index(width, height) else {
                    continue;
                };
                if !visited.insert(i) {
                    continue;
                }
                if self.grid.bit(i) {
                    return Some(next);
                }
                queue.push_back((next, depth + 1));
            }
        }
        None
    }

    /// A* over the 8-connected grid. Scratch state is sparse so a query
    /// only pays for the tiles it touches.
    fn search(&self, start: TileCoord, goal: TileCoord) -> Option<Vec<TileCoord>> {
        let width = self.grid.width;
        let height = self.grid.height;
        let start_index = start.to_index(width, height)?;
        let goal_index = goal.to_index(width, height)?;

        let mut g_score: AHashMap<usize, u32> = AHashMap::new();
        let mut came_from: AHashMap<usize, usize> = AHashMap::new();
        let mut closed: AHashSet<usize> = AHashSet::new();
        let mut open = BinaryHeap::new();
        let mut expanded = 0usize;

        g_score.insert(start_index, 0);
        let h = start.chebyshev_distance(goal);
        open.push(OpenNode {
            f: h,
            h,
            index: start_index,
        });

        while let Some(node) = open.pop() {
            if node.index == goal_index {
                trace!("A* {} -> {}: expanded {} nodes", start, goal, expanded);
                return Some(reconstruct(&came_from, start_index, goal_index, width));
            }
            if !closed.insert(node.index) {
                continue;
            }
            expanded += 1;

            let current = TileCoord::from_index(node.index, width);
            let step_cost = g_score.get(&node.index).map_or(u32::MAX, |g| g + 1);
            for (dx, dy) in TileCoord::NEIGHBORS_8 {
                let next = current.offset(dx, dy);
                let Some(next_index) = next.to_index(width, height) else {
                    continue;
                };
                if closed.contains(&next_index) || !self.grid.bit(next_index) {
                    continue;
                }
                if dx != 0
                    && dy != 0
                    && !self.config.allow_corner_cutting
                    && !(self.grid.is_passable(current.offset(dx, 0))
                        && self.grid.is_passable(current.offset(0, dy)))
                {
                    continue;
                }
                if step_cost < g_score.get(&next_index).copied().unwrap_or(u32::MAX) {
                    g_score.insert(next_index, step_cost);
                    came_from.insert(next_index, node.index);
                    let h = next.chebyshev_distance(goal);
                    open.push(OpenNode {
                        f: step_cost + h,
                        h,
                        index: next_index,
                    });
                }
            }
        }

        trace!("A* {} -> {}: exhausted after {} nodes", start, goal, expanded);
        None
    }
}

fn reconstruct(
    came_from: &AHashMap<usize, usize>,
    start: usize,
    goal: usize,
    width: u32,
) -> Vec<TileCoord> {
    let mut path = vec![TileCoord::from_index(goal, width)];
    let mut current = goal;
    while current != start {
        let Some(&previous) = came_from.get(&current) else {
            break;
        };
        current = previous;
        path.push(TileCoord::from_index(current, width));
    }
    path.reverse();
    path
}

/// Passability grid shared between the simulation and path query threads.
///
/// Rebuilt grids are published by swapping in a new `Arc`; readers keep
/// whichever snapshot they cloned, so no query ever sees a half-updated grid.
#[derive(Debug)]
pub struct SharedPassability {
    current: RwLock<Arc<PassabilityGrid>>,
    generation: AtomicU64,
}

impl SharedPassability {
    /// Wraps an initial grid.
    #[must_use]
    pub fn new(grid: PassabilityGrid) -> Self {
        Self {
            current: RwLock::new(Arc::new(grid)),
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<PassabilityGrid> {
        Arc::clone(&self.current.read())
    }

    /// Publishes a rebuilt grid, returning the new generation number.
    pub fn publish(&self, grid: PassabilityGrid) -> u64 {
        *self.current.write() = Arc::new(grid);
        let generation = self.generation.fetch_add(1, AtomicOrdering::AcqRel) + 1;
        debug!("Published passability grid generation {}", generation);
        generation
    }

    /// Number of grids published since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(AtomicOrdering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TerrainType, Tile};
    use proptest::prelude::*;

    fn open_finder(width: u32, height: u32) -> Pathfinder {
        Pathfinder::new(
            Arc::new(PassabilityGrid::open(width, height)),
            PathfindingConfig::default(),
        )
    }

    fn finder_with_walls(width: u32, height: u32, walls: &[(i32, i32)]) -> Pathfinder {
        let mut grid = PassabilityGrid::open(width, height);
        for &(x, y) in walls {
            grid.set_passable(TileCoord::new(x, y), false);
        }
        Pathfinder::new(Arc::new(grid), PathfindingConfig::default())
    }

    fn assert_valid_path(finder: &Pathfinder, path: &[TileCoord]) {
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev_distance(pair[1]), 1, "non-adjacent step");
            assert!(finder.grid().is_passable(pair[1]), "{} is blocked", pair[1]);
        }
    }

    #[test]
    fn test_open_grid_diagonal() {
        let finder = open_finder(10, 10);
        let path = finder
            .find_path(TileCoord::new(0, 0), TileCoord::new(9, 9))
            .expect("open grid path");
        assert_eq!(path.len(), 10);
        assert_eq!(path.first(), Some(&TileCoord::new(0, 0)));
        assert_eq!(path.last(), Some(&TileCoord::new(9, 9)));
        assert_valid_path(&finder, &path);
    }

    #[test]
    fn test_out_of_bounds() {
        let finder = open_finder(10, 10);
        assert_eq!(
            finder.find_path(TileCoord::new(-1, 0), TileCoord::new(5, 5)),
            Err(PathError::StartOutOfBounds(TileCoord::new(-1, 0)))
        );
        assert_eq!(
            finder.find_path(TileCoord::new(0, 0), TileCoord::new(10, 5)),
            Err(PathError::GoalOutOfBounds(TileCoord::new(10, 5)))
        );
    }

    #[test]
    fn test_same_start_and_goal() {
        let finder = open_finder(4, 4);
        let path = finder
            .find_path(TileCoord::new(2, 2), TileCoord::new(2, 2))
            .expect("trivial path");
        assert_eq!(path, vec![TileCoord::new(2, 2)]);
    }

    #[test]
    fn test_routes_around_wall() {
        // Vertical wall at x = 5 with a gap at y = 9.
        let walls: Vec<_> = (0..9).map(|y| (5, y)).collect();
        let finder = finder_with_walls(10, 10, &walls);
        let path = finder
            .find_path(TileCoord::new(0, 0), TileCoord::new(9, 0))
            .expect("path through gap");
        assert!(path.contains(&TileCoord::new(5, 9)));
        assert_valid_path(&finder, &path);
    }

    #[test]
    fn test_short_queries_on_max_size_grid() {
        use crate::config::MAX_DIMENSION;

        let mut grid = PassabilityGrid::open(MAX_DIMENSION, MAX_DIMENSION);
        grid.set_passable(TileCoord::new(2000, 2000), false);
        let finder = Pathfinder::new(Arc::new(grid), PathfindingConfig::default());

        for _ in 0..64 {
            let path = finder
                .find_path(TileCoord::new(1995, 1995), TileCoord::new(2000, 2000))
                .expect("redirected short path");
            assert_eq!(path.len(), 6);
            assert_eq!(path.last(), Some(&TileCoord::new(2000, 1999)));
            assert_valid_path(&finder, &path);
        }
    }

    #[test]
    fn test_unreachable() {
        let walls: Vec<_> = (0..10).map(|y| (5, y)).collect();
        let finder = finder_with_walls(10, 10, &walls);
        assert!(matches!(
            finder.find_path(TileCoord::new(0, 0), TileCoord::new(9, 9)),
            Err(PathError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_blocked_goal_redirects() {
        let finder = finder_with_walls(10, 10, &[(5, 5)]);
        let path = finder
            .find_path(TileCoord::new(0, 5), TileCoord::new(5, 5))
            .expect("redirected path");
        let end = *path.last().expect("non-empty path");
        assert_ne!(end, TileCoord::new(5, 5));
        assert_eq!(end.manhattan_distance(TileCoord::new(5, 5)), 1);
        assert_valid_path(&finder, &path);
    }

    #[test]
    fn test_blocked_goal_outside_radius_fails() {
        // 9x9 block of walls: the center is 5 steps from the nearest open tile.
        let walls: Vec<_> = (3..=11)
            .flat_map(|y| (3..=11).map(move |x| (x, y)))
            .collect();
        let finder = finder_with_walls(15, 15, &walls);
        assert_eq!(
            finder.nearest_passable(TileCoord::new(7, 7), 5),
            Some(TileCoord::new(7, 2))
        );

        // 11x11 block: 6 steps, one beyond the radius.
        let walls: Vec<_> = (2..=12)
            .flat_map(|y| (2..=12).map(move |x| (x, y)))
            .collect();
        let finder = finder_with_walls(15, 15, &walls);
        assert_eq!(
            finder.find_path(TileCoord::new(0, 0), TileCoord::new(7, 7)),
            Err(PathError::NoPassableGoal {
                goal: TileCoord::new(7, 7),
                radius: 5
            })
        );
    }

    #[test]
    fn test_corner_cutting_disabled() {
        let mut grid = PassabilityGrid::open(3, 3);
        grid.set_passable(TileCoord::new(1, 0), false);
        grid.set_passable(TileCoord::new(0, 1), false);
        let config = PathfindingConfig {
            allow_corner_cutting: false,
            ..PathfindingConfig::default()
        };
        let strict = Pathfinder::new(Arc::new(grid.clone()), config);
        assert!(matches!(
            strict.find_path(TileCoord::new(0, 0), TileCoord::new(2, 2)),
            Err(PathError::Unreachable { .. })
        ));

        let loose = Pathfinder::new(Arc::new(grid), PathfindingConfig::default());
        let path = loose
            .find_path(TileCoord::new(0, 0), TileCoord::new(2, 2))
            .expect("diagonal squeeze");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_grid_from_tiles() {
        let mut tiles = TileGrid::filled(70, 2, Tile::new(TerrainType::Plains, 0.0, 0.0));
        if let Some(tile) = tiles.get_mut(TileCoord::new(66, 1)) {
            tile.set_terrain(TerrainType::Mountains);
        }
        let grid = PassabilityGrid::from_tiles(&tiles);
        assert_eq!(grid.passable_count(), 139);
        assert!(!grid.is_passable(TileCoord::new(66, 1)));
        assert!(grid.is_passable(TileCoord::new(65, 1)));
        assert!(!grid.is_passable(TileCoord::new(70, 0)));
        assert_eq!(PassabilityGrid::open(70, 2), {
            let mut open = grid.clone();
            open.set_passable(TileCoord::new(66, 1), true);
            open
        });
    }

    #[test]
    fn test_shared_passability_swap() {
        let shared = SharedPassability::new(PassabilityGrid::open(4, 4));
        let before = shared.snapshot();

        let mut edited = (*before).clone();
        edited.set_passable(TileCoord::new(1, 1), false);
        assert_eq!(shared.publish(edited), 1);

        assert!(before.is_passable(TileCoord::new(1, 1)));
        assert!(!shared.snapshot().is_passable(TileCoord::new(1, 1)));
        assert_eq!(shared.generation(), 1);
    }

    #[test]
    fn test_pathfinder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pathfinder>();
        assert_send_sync::<SharedPassability>();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_open_grid_paths_are_optimal(
            sx in 0i32..20, sy in 0i32..20, gx in 0i32..20, gy in 0i32..20,
        ) {
            let finder = open_finder(20, 20);
            let start = TileCoord::new(sx, sy);
            let goal = TileCoord::new(gx, gy);
            let path = finder.find_path(start, goal).expect("open grid");
            prop_assert_eq!(path.len() as u32, start.chebyshev_distance(goal) + 1);
        }

        #[test]
        fn prop_paths_avoid_walls(seed in any::<u64>()) {
            let mut rng = fastrand::Rng::with_seed(seed);
            let mut grid = PassabilityGrid::open(16, 16);
            for _ in 0..60 {
                grid.set_passable(TileCoord::new(rng.i32(0..16), rng.i32(0..16)), false);
            }
            grid.set_passable(TileCoord::new(0, 0), true);
            let finder = Pathfinder::new(Arc::new(grid), PathfindingConfig::default());
            if let Ok(path) = finder.find_path(TileCoord::new(0, 0), TileCoord::new(15, 15)) {
                prop_assert!(path.len() as u32 > TileCoord::new(0, 0).chebyshev_distance(TileCoord::new(15, 15)));
                for pair in path.windows(2) {
                    prop_assert_eq!(pair[0].chebyshev_distance(pair[1]), 1);
                    prop_assert!(finder.grid().is_passable(pair[1]));
                }
            }
        }
    }
}
