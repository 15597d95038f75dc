//! Error types for Frontier.

use thiserror::Error;

/// Top-level error type for Frontier operations.
#[derive(Debug, Error)]
pub enum FrontierError {
    /// Map query/mutation errors
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    /// Snapshot restore errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected map mutations. The map is left unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// Coordinates outside the map
    #[error("Tile ({x}, {y}) is out of bounds")]
    OutOfBounds {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
    },

    /// No resource node on the tile
    #[error("No resource at ({x}, {y})")]
    NoResource {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
    },

    /// The resource node exists but is depleted
    #[error("Resource at ({x}, {y}) is depleted")]
    ResourceDepleted {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
    },
}

/// Errors raised while restoring a map from snapshot data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },

    /// Dimensions are zero or too large
    #[error("Invalid map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Map width
        width: u32,
        /// Map height
        height: u32,
    },

    /// Tile array length does not match the dimensions
    #[error("Expected {expected} tiles, found {actual}")]
    TileCountMismatch {
        /// `width * height`
        expected: usize,
        /// Length of the tile array
        actual: usize,
    },

    /// A resource node sits outside the map
    #[error("Resource at ({x}, {y}) lies outside the map")]
    ResourceOutOfBounds {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
    },
}

/// Result type alias for Frontier operations.
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Result type alias for map mutations.
pub type MapResult<T> = Result<T, MapError>;
