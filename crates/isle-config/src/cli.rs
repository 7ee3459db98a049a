//! Command-line argument parsing for isle hosts.

use std::path::PathBuf;

use clap::Parser;

use crate::GenerationConfig;

/// isle command-line arguments.
///
/// CLI values override settings loaded from `terrain.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "isle", about = "Procedural island terrain generator")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<i32>,

    /// Map side in cells (multiple of the chunk size).
    #[arg(long)]
    pub map_size: Option<i32>,

    /// Chunk side in cells.
    #[arg(long)]
    pub chunk_size: Option<i32>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<i32>,

    /// Subtract the island falloff mask.
    #[arg(long)]
    pub falloff: Option<bool>,

    /// Shape heights into plateaus.
    #[arg(long)]
    pub plateaus: Option<bool>,

    /// Blur the falloff mask.
    #[arg(long)]
    pub blur: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write grayscale PNG previews of the shaped field into this directory.
    #[arg(long)]
    pub preview_dir: Option<PathBuf>,
}

impl GenerationConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(map_size) = args.map_size {
            self.map_size = map_size;
        }
        if let Some(chunk_size) = args.chunk_size {
            self.chunk_size = chunk_size;
        }
        if let Some(octaves) = args.octaves {
            self.octaves = octaves;
        }
        if let Some(falloff) = args.falloff {
            self.use_falloff = falloff;
        }
        if let Some(plateaus) = args.plateaus {
            self.use_plateaus = plateaus;
        }
        if let Some(blur) = args.blur {
            self.use_blur = blur;
        }
    }
}
