//! One regeneration: the shaped height field plus the mesh builder that
//! slices it into chunks.

use isle_config::{GenerationConfig, ValidatedConfig};
use isle_mesh::{ChunkCoord, ChunkMeshBuilder, ChunkMeshRecord, MeshError};
use isle_terrain::{
    FalloffMask, FalloffParams, FieldWarning, HeightField, NoiseParams, PlateauParams,
    apply_falloff, generate_falloff_mask, generate_noise_field, remap_heights, shape_plateaus,
};

use crate::error::GenerationError;

/// The output of the shaping stages for one config.
///
/// Every chunk of the run reads from the same [`HeightField`], so the border
/// vertices of adjacent chunks are built from the same samples.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    config: ValidatedConfig,
    field: HeightField,
    falloff: Option<FalloffMask>,
    builder: ChunkMeshBuilder,
    /// Time spent shaping the field, in microseconds (for profiling).
    pub prepare_time_us: u64,
}

impl GenerationRun {
    /// Validate `config` and run noise, falloff, plateau and curve shaping.
    ///
    /// Fails before any noise is sampled if the config is invalid.
    pub fn prepare(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let validated = config.validate()?;
        let start = std::time::Instant::now();
        let settings = validated.config();
        let size = validated.field_size();

        let mut field = generate_noise_field(&NoiseParams::from_config(&validated), size, size);

        let falloff = if settings.use_falloff {
            let mask = generate_falloff_mask(size, size, &FalloffParams::from_config(&validated));
            field = apply_falloff(&field, &mask)?;
            Some(mask)
        } else {
            None
        };

        if settings.use_plateaus {
            field = shape_plateaus(&field, &PlateauParams::from_config(settings));
        }

        if let Some(curve) = &settings.height_curve {
            field = remap_heights(&field, curve)?;
        }

        let builder = ChunkMeshBuilder::new(validated.chunk_size(), validated.chunks_per_row());
        let prepare_time_us = start.elapsed().as_micros() as u64;

        tracing::info!(
            seed = settings.seed,
            field_size = size,
            chunks = builder.chunk_count(),
            falloff = settings.use_falloff,
            plateaus = settings.use_plateaus,
            prepare_time_us,
            "terrain field prepared"
        );

        Ok(Self {
            config: validated,
            field,
            falloff,
            builder,
            prepare_time_us,
        })
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// The fully shaped field that chunks are cut from.
    pub fn height_field(&self) -> &HeightField {
        &self.field
    }

    /// The falloff mask, if falloff was enabled.
    pub fn falloff_mask(&self) -> Option<&FalloffMask> {
        self.falloff.as_ref()
    }

    pub fn warnings(&self) -> &[FieldWarning] {
        self.field.warnings()
    }

    pub fn chunks_per_row(&self) -> usize {
        self.builder.chunks_per_row()
    }

    pub fn chunk_count(&self) -> usize {
        self.builder.chunk_count()
    }

    /// Build the mesh of the chunk with row-major id `chunk_id`.
    pub fn build_chunk(&self, chunk_id: usize) -> Result<ChunkMeshRecord, MeshError> {
        let coord = ChunkCoord::from_chunk_id(chunk_id, self.builder.chunks_per_row());
        self.builder
            .build(&self.field, coord, self.config.config().height_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_config::{ConfigError, TilingMode};

    #[test]
    fn test_prepare_default_config() {
        let run = GenerationRun::prepare(&GenerationConfig::default()).unwrap();
        assert_eq!(run.height_field().dimensions(), (105, 105));
        assert_eq!(run.chunk_count(), 25);
        assert!(run.falloff_mask().is_some());
        assert!(run.warnings().is_empty());
    }

    #[test]
    fn test_shared_edge_field_size() {
        let config = GenerationConfig {
            tiling: TilingMode::SharedEdge,
            ..Default::default()
        };
        let run = GenerationRun::prepare(&config).unwrap();
        assert_eq!(run.height_field().dimensions(), (101, 101));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GenerationConfig {
            map_size: 100,
            chunk_size: 30,
            ..Default::default()
        };
        let err = GenerationRun::prepare(&config).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Config(ConfigError::MapSizeNotMultiple { .. })
        ));
    }

    #[test]
    fn test_falloff_disabled_keeps_normalized_noise() {
        let config = GenerationConfig {
            use_falloff: false,
            ..Default::default()
        };
        let run = GenerationRun::prepare(&config).unwrap();
        assert!(run.falloff_mask().is_none());
        let (min, max) = run.height_field().min_max().unwrap();
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_heights_stay_in_unit_range_with_all_stages() {
        let config = GenerationConfig {
            use_plateaus: true,
            use_blur: true,
            blur_radius: 2,
            height_curve: Some(isle_config::HeightCurve::new(vec![[0.0, 0.0], [1.0, 0.8]])),
            ..Default::default()
        };
        let run = GenerationRun::prepare(&config).unwrap();
        assert!(
            run.height_field()
                .values()
                .iter()
                .all(|v| (0.0..=1.0).contains(v))
        );
    }

    #[test]
    fn test_invalid_curve_is_a_field_error() {
        let config = GenerationConfig {
            height_curve: Some(isle_config::HeightCurve::new(vec![])),
            ..Default::default()
        };
        let err = GenerationRun::prepare(&config).unwrap_err();
        assert!(matches!(err, GenerationError::Field(_)));
    }

    #[test]
    fn test_build_chunk_uses_row_major_ids() {
        let run = GenerationRun::prepare(&GenerationConfig::default()).unwrap();
        let record = run.build_chunk(17).unwrap();
        assert_eq!(record.chunk_id, 17);
        assert_eq!(record.origin, ChunkCoord::new(2, 3));
    }
}
