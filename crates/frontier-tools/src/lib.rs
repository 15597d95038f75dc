//! # Frontier Tools
//!
//! Development tools for the Frontier map core.
//!
//! This crate provides:
//! - Map generator configuration (TOML)
//! - Tile inspector and map reports
//! - ASCII map preview
//! - Determinism fingerprints

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod fingerprint;
pub mod inspector;
pub mod preview;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::fingerprint::*;
    pub use crate::inspector::*;
    pub use crate::preview::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_map::GameMap;

    #[test]
    fn test_config_drives_generation() {
        let mut config = MapgenConfig::default();
        config.map.width = 24;
        config.map.height = 18;
        config.validate();

        let map = GameMap::generate(config.map.clone());
        let report = MapReport::build(&map);
        assert_eq!((report.width, report.height), (24, 18));

        let preview = render_ascii(
            &map,
            &PreviewOptions {
                show_resources: config.show_resources,
                ..PreviewOptions::default()
            },
        );
        assert_eq!(preview.lines().count(), 18);
    }

    #[test]
    fn test_snapshot_restore_keeps_fingerprint() {
        let map = GameMap::generate(MapgenConfig::default().map);
        let json = serde_json::to_string(&map.snapshot()).expect("serialize");
        let snapshot = serde_json::from_str(&json).expect("deserialize");
        let restored =
            GameMap::from_snapshot(snapshot, MapgenConfig::default().map).expect("restore");
        assert_eq!(map_fingerprint(&restored), map_fingerprint(&map));
    }
}
