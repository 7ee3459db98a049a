//! Generation settings with sensible defaults, validation, and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used when persisting a [`GenerationConfig`] to a directory.
pub const CONFIG_FILE_NAME: &str = "terrain.ron";

/// How the shared height field is sized relative to the chunk grid.
///
/// Both layouts give every chunk `chunk_size + 1` samples per side read from
/// one shared array, so boundary samples are never recomputed per chunk.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TilingMode {
    /// Field side is `map_size + chunks_per_row`: one spare sample per chunk
    /// boundary row, the layout used by the streaming map generator.
    #[default]
    Padded,
    /// Field side is `map_size + 1`: exactly the samples the chunk grid needs.
    SharedEdge,
}

impl TilingMode {
    /// Side length of the square height field for a map of `map_size` cells
    /// split into `chunks_per_row` chunks per side.
    pub fn field_size(self, map_size: usize, chunks_per_row: usize) -> usize {
        match self {
            TilingMode::Padded => map_size + chunks_per_row,
            TilingMode::SharedEdge => map_size + 1,
        }
    }
}

/// Distance metric used by the falloff mask.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FalloffShape {
    /// Chebyshev distance from the centre: square island silhouette.
    #[default]
    Square,
    /// Euclidean distance from the centre, clamped to 1: round silhouette.
    Radial,
}

/// Piecewise-linear remap curve applied to normalized heights.
///
/// Control points are `[input, output]` pairs on `[0, 1]`, sorted by input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeightCurve {
    /// Control points as `[input, output]` pairs.
    pub points: Vec<[f32; 2]>,
}

impl HeightCurve {
    /// Build a curve from `[input, output]` control points.
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self { points }
    }

    /// The identity curve `y = x`.
    pub fn identity() -> Self {
        Self::new(vec![[0.0, 0.0], [1.0, 1.0]])
    }
}

/// All parameters of one terrain generation run.
///
/// Immutable once a run starts: the streamer validates and clones it up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// World seed. Offsets the noise sample point.
    pub seed: i32,
    /// Base noise frequency across the whole field.
    pub frequency: f32,
    /// Per-octave frequency multiplier.
    pub lacunarity: f32,
    /// Per-octave amplitude multiplier.
    pub persistence: f32,
    /// Number of noise octaves. Must be positive.
    pub octaves: i32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// Vertical scale applied to normalized heights when meshing.
    pub height_scale: f32,
    /// Map side in cells. Must be a positive multiple of `chunk_size`.
    pub map_size: i32,
    /// Chunk side in cells. Must be positive.
    pub chunk_size: i32,
    /// Falloff curve steepness (`a`).
    pub falloff_a: f32,
    /// Falloff curve shift (`b`).
    pub falloff_b: f32,
    /// Blur the falloff mask with a separable Gaussian.
    pub use_blur: bool,
    /// Gaussian blur radius in cells. Must not be negative.
    pub blur_radius: i32,
    /// Plateau band upper edges `p1 <= p2 <= p3 <= p4`.
    pub plateau_thresholds: [f32; 4],
    /// Plateau smoothing: 0 quantizes hard, 1 leaves heights unchanged.
    pub plateau_smoothing: f32,
    /// Subtract the falloff mask from the noise field.
    pub use_falloff: bool,
    /// Shape the field into banded plateaus.
    pub use_plateaus: bool,
    /// Height field layout relative to the chunk grid.
    pub tiling: TilingMode,
    /// Distance metric of the falloff mask.
    pub falloff_shape: FalloffShape,
    /// Optional remap curve applied after plateau shaping.
    pub height_curve: Option<HeightCurve>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 6.4,
            lacunarity: 1.8,
            persistence: 0.5,
            octaves: 3,
            amplitude: 3.8,
            height_scale: 2.0,
            map_size: 100,
            chunk_size: 20,
            falloff_a: 3.0,
            falloff_b: 2.2,
            use_blur: false,
            blur_radius: 5,
            plateau_thresholds: [0.2, 0.4, 0.6, 0.9],
            plateau_smoothing: 0.5,
            use_falloff: true,
            use_plateaus: false,
            tiling: TilingMode::default(),
            falloff_shape: FalloffShape::default(),
            height_curve: None,
        }
    }
}

/// A [`GenerationConfig`] that passed validation, with its grid sizes resolved
/// to unsigned values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: GenerationConfig,
    map_size: usize,
    chunk_size: usize,
    chunks_per_row: usize,
    field_size: usize,
    octaves: u32,
    blur_radius: usize,
}

impl ValidatedConfig {
    /// The validated settings.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Map side in cells.
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Chunk side in cells.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunks along one side of the map.
    pub fn chunks_per_row(&self) -> usize {
        self.chunks_per_row
    }

    /// Total number of chunks in the map.
    pub fn chunk_count(&self) -> usize {
        self.chunks_per_row * self.chunks_per_row
    }

    /// Side length of the square height field.
    pub fn field_size(&self) -> usize {
        self.field_size
    }

    /// Number of noise octaves.
    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Gaussian blur radius in cells.
    pub fn blur_radius(&self) -> usize {
        self.blur_radius
    }
}

impl GenerationConfig {
    /// Check the grid and octave settings and resolve the derived sizes.
    ///
    /// All other numeric settings are accepted as-is; the stages that use
    /// them clamp where a value would otherwise break a formula.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        if self.chunk_size <= 0 {
            return Err(ConfigError::ChunkSizeNotPositive(self.chunk_size));
        }
        if self.map_size <= 0 || self.map_size % self.chunk_size != 0 {
            return Err(ConfigError::MapSizeNotMultiple {
                map_size: self.map_size,
                chunk_size: self.chunk_size,
            });
        }
        if self.octaves <= 0 {
            return Err(ConfigError::OctavesNotPositive(self.octaves));
        }
        if self.blur_radius < 0 {
            return Err(ConfigError::NegativeBlurRadius(self.blur_radius));
        }

        let map_size = self.map_size as usize;
        let chunk_size = self.chunk_size as usize;
        let chunks_per_row = map_size / chunk_size;

        Ok(ValidatedConfig {
            config: self.clone(),
            map_size,
            chunk_size,
            chunks_per_row,
            field_size: self.tiling.field_size(map_size, chunks_per_row),
            octaves: self.octaves as u32,
            blur_radius: self.blur_radius as usize,
        })
    }
}

// --- Load / Save / Reload ---

impl GenerationConfig {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: GenerationConfig =
                ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded terrain config from {}", config_path.display());
            Ok(config)
        } else {
            let config = GenerationConfig::default();
            config.save(config_dir)?;
            log::info!("Created default terrain config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as [`CONFIG_FILE_NAME`].
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: GenerationConfig =
            ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Terrain config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
