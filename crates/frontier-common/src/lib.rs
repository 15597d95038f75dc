//! # Frontier Common
//!
//! Common types shared by the Frontier map core and its tooling:
//! - Tile coordinates
//! - Faction IDs
//! - Schema versions for exported map data
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_converts_to_frontier_error() {
        let err: FrontierError = MapError::OutOfBounds { x: -1, y: 3 }.into();
        assert!(matches!(err, FrontierError::Map(_)));
        assert_eq!(err.to_string(), "Map error: Tile (-1, 3) is out of bounds");
    }

    #[test]
    fn test_faction_ids_are_ordered() {
        assert!(FactionId::NEUTRAL < FactionId::PLAYER);
        assert_eq!(FactionId::new(7).raw(), 7);
    }

    #[test]
    fn test_coord_serializes_as_struct() {
        let json = serde_json::to_string(&TileCoord::new(4, 9)).expect("serialize");
        assert_eq!(json, r#"{"x":4,"y":9}"#);
    }
}
