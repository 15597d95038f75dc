//! # Frontier Map Generator
//!
//! Generates a map from `frontier.toml` plus command-line overrides, then
//! prints a report and optionally an ASCII preview, a path query and a JSON
//! snapshot.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use frontier_common::{FactionId, TileCoord};
use frontier_map::{GameMap, MapSnapshot, Observer};
use frontier_tools::{
    map_fingerprint, render_ascii, MapReport, MapgenConfig, PreviewOptions, CONFIG_FILE,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "frontier-mapgen")]
#[command(about = "Generate and inspect Frontier RTS maps")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Map width in tiles
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Map height in tiles
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Generation seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fraction of tiles that receive a resource node (0.0 - 1.0)
    #[arg(short, long)]
    density: Option<f64>,

    /// Mirror terrain about the map center
    #[arg(long)]
    symmetric: bool,

    /// Print an ASCII preview
    #[arg(short, long)]
    preview: bool,

    /// Render the preview through fog revealed from the starting positions
    #[arg(long)]
    fog: bool,

    /// Find a path between two tiles and overlay it on the preview
    #[arg(long, num_args = 4, value_names = ["X0", "Y0", "X1", "Y1"], allow_negative_numbers = true)]
    path: Option<Vec<i32>>,

    /// Restore the map from a JSON snapshot instead of generating it
    #[arg(long)]
    restore: Option<PathBuf>,

    /// Write a JSON snapshot of the map
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write the effective configuration to a TOML file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

impl Args {
    /// Applies command-line overrides on top of file values.
    fn apply(&self, config: &mut MapgenConfig) {
        if let Some(width) = self.width {
            config.map.width = width;
        }
        if let Some(height) = self.height {
            config.map.height = height;
        }
        if let Some(seed) = self.seed {
            config.map.generation.seed = seed;
        }
        if let Some(density) = self.density {
            config.map.generation.resource_density = density;
        }
        if self.symmetric {
            config.map.generation.symmetric = true;
        }
        config.validate();
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("frontier=info".parse()?))
        .init();

    let args = Args::parse();
    let mut config = MapgenConfig::load_from(&args.config);
    args.apply(&mut config);

    if let Some(path) = &args.save_config {
        config
            .save_to(path)
            .with_context(|| format!("writing config to {}", path.display()))?;
    }

    let mut map = match &args.restore {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            let snapshot: MapSnapshot =
                serde_json::from_str(&json).context("parsing snapshot")?;
            GameMap::from_snapshot(snapshot, config.map.clone())?
        },
        None => GameMap::generate(config.map.clone()),
    };

    println!("{}", MapReport::build(&map));
    println!("  fingerprint: {:016x}", map_fingerprint(&map));

    let route = match args.path.as_deref() {
        Some(&[x0, y0, x1, y1]) => {
            let start = TileCoord::new(x0, y0);
            let goal = TileCoord::new(x1, y1);
            match map.find_path(start, goal) {
                Ok(path) => {
                    println!("Path {start} -> {goal}: {} steps", path.len() - 1);
                    path
                },
                Err(e) => {
                    warn!("{e}");
                    Vec::new()
                },
            }
        },
        _ => Vec::new(),
    };

    if args.fog {
        let observers: Vec<_> = map
            .starting_positions()
            .iter()
            .map(|&p| Observer::new(p, config.preview_view_range))
            .collect();
        map.update_faction_visibility(FactionId::PLAYER, &observers);
    }

    if args.preview {
        let options = PreviewOptions {
            show_resources: config.show_resources,
            fog: args.fog.then_some(FactionId::PLAYER),
            path: route,
            show_starts: true,
        };
        print!("{}", render_ascii(&map, &options));
    }

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&map.snapshot())?;
        fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}
