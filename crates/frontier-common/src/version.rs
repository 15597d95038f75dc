//! Schema versions for data handed to save systems.

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Semantic version stamped on exported map data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Incremented when old readers can no longer understand the data
    pub major: u16,
    /// Incremented for additive changes
    pub minor: u16,
    /// Incremented for fixes that do not change the layout
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Version written by the current map snapshot code.
    pub const MAP_SNAPSHOT: Self = Self::new(1, 0, 0);

    /// Whether a reader at this version understands data written at `data_version`.
    ///
    /// Readers accept anything within their major version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }

    /// Fails with [`SnapshotError::VersionMismatch`] if `data_version` is unreadable.
    pub fn ensure_readable(&self, data_version: &Self) -> Result<(), SnapshotError> {
        if self.can_read(data_version) {
            Ok(())
        } else {
            Err(SnapshotError::VersionMismatch {
                expected: self.to_string(),
                actual: data_version.to_string(),
            })
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
