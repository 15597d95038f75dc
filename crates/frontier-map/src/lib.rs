//! # Frontier Map
//!
//! Spatial core of the Frontier RTS.
//!
//! This crate handles:
//! - Seeded terrain generation with carved starting areas
//! - Resource cluster placement and harvesting
//! - A* pathfinding over a shared passability grid
//! - Fog of war, shared or per faction
//! - Map snapshots for save systems

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod map;
pub mod noise;
pub mod pathfinding;
pub mod resources;
pub mod snapshot;
pub mod terrain;
pub mod tile;
pub mod visibility;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::map::*;
    pub use crate::pathfinding::*;
    pub use crate::resources::*;
    pub use crate::snapshot::*;
    pub use crate::terrain::*;
    pub use crate::tile::*;
    pub use crate::visibility::*;
}

pub use prelude::*;
