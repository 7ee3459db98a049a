//! Multi-octave fractal noise over a whole field, normalized to `[0, 1]`.
//!
//! Normalization runs over the entire field before any chunking: per-chunk
//! normalization would give adjacent chunks different scales and break their
//! shared edges.

use isle_config::ValidatedConfig;
use noise::{NoiseFn, Perlin};

use crate::error::FieldWarning;
use crate::height_field::HeightField;

/// Permutation seed of the Perlin primitive. The world seed enters only
/// through the sample offset, so this stays fixed.
pub const NOISE_PERMUTATION_SEED: u32 = 0;

/// Noise parameters of one field computation.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// World seed, added to each cell coordinate before sampling.
    pub seed: i32,
    /// Frequency of the first octave across the whole field.
    pub frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Number of octaves to accumulate.
    pub octaves: u32,
    /// Amplitude of the first octave.
    pub amplitude: f64,
}

impl NoiseParams {
    /// Noise parameters of a validated generation config.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let settings = config.config();
        Self {
            seed: settings.seed,
            frequency: f64::from(settings.frequency),
            lacunarity: f64::from(settings.lacunarity),
            persistence: f64::from(settings.persistence),
            octaves: config.octaves(),
            amplitude: f64::from(settings.amplitude),
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 1337,
            frequency: 6.4,
            lacunarity: 1.8,
            persistence: 0.5,
            octaves: 3,
            amplitude: 3.8,
        }
    }
}

/// Accumulate `params.octaves` layers of Perlin noise for one cell.
///
/// The sample point is `((x + seed) / width * f, (z + seed) / height * f)`
/// where `f` starts at `params.frequency` and is multiplied by the lacunarity
/// after every octave; the amplitude decays by the persistence the same way.
fn sample_cell(
    perlin: &Perlin,
    params: &NoiseParams,
    x: usize,
    z: usize,
    width: usize,
    height: usize,
) -> f64 {
    let u = (x as f64 + f64::from(params.seed)) / width as f64;
    let v = (z as f64 + f64::from(params.seed)) / height as f64;

    let mut total = 0.0;
    let mut frequency = params.frequency;
    let mut amplitude = params.amplitude;

    for _ in 0..params.octaves {
        total += perlin.get([u * frequency, v * frequency]) * amplitude;
        frequency *= params.lacunarity;
        amplitude *= params.persistence;
    }

    total
}

/// Generate a `width x height` fractal noise field normalized to `[0, 1]`.
///
/// The raw minimum maps to 0 and the raw maximum to 1. A flat accumulation
/// (`max == min`) yields a constant 0.5 field carrying a
/// [`FieldWarning::Degenerate`].
pub fn generate_noise_field(params: &NoiseParams, width: usize, height: usize) -> HeightField {
    let perlin = Perlin::new(NOISE_PERMUTATION_SEED);

    let mut raw = Vec::with_capacity(width * height);
    for z in 0..height {
        for x in 0..width {
            raw.push(sample_cell(&perlin, params, x, z, width, height));
        }
    }

    let (min, max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    tracing::debug!(
        width,
        height,
        octaves = params.octaves,
        min,
        max,
        "accumulated noise field"
    );

    if raw.is_empty() || !range.is_finite() || range <= 0.0 {
        tracing::warn!(
            value = min,
            "noise field is flat, falling back to constant 0.5"
        );
        return HeightField::filled(width, height, 0.5)
            .with_warning(FieldWarning::Degenerate { value: min });
    }

    let values = raw
        .into_iter()
        .map(|v| (((v - min) / range) as f32).clamp(0.0, 1.0))
        .collect();

    HeightField::from_parts(width, height, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_bounds_are_exact() {
        let field = generate_noise_field(&NoiseParams::default(), 64, 64);
        let (lo, hi) = field.min_max().unwrap();
        assert_eq!(lo, 0.0, "raw minimum must map to 0");
        assert_eq!(hi, 1.0, "raw maximum must map to 1");
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(field.warnings().is_empty());
    }

    #[test]
    fn test_determinism_same_params() {
        let params = NoiseParams {
            seed: 42,
            ..Default::default()
        };
        let a = generate_noise_field(&params, 48, 48);
        let b = generate_noise_field(&params, 48, 48);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = generate_noise_field(
            &NoiseParams {
                seed: 1,
                ..Default::default()
            },
            32,
            32,
        );
        let b = generate_noise_field(
            &NoiseParams {
                seed: 999,
                ..Default::default()
            },
            32,
            32,
        );
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_zero_amplitude_is_degenerate() {
        let params = NoiseParams {
            amplitude: 0.0,
            ..Default::default()
        };
        let field = generate_noise_field(&params, 16, 16);
        assert!(field.values().iter().all(|&v| v == 0.5));
        assert_eq!(
            field.warnings(),
            &[FieldWarning::Degenerate { value: 0.0 }]
        );
    }

    #[test]
    fn test_single_cell_is_degenerate() {
        let field = generate_noise_field(&NoiseParams::default(), 1, 1);
        assert_eq!(field.values(), &[0.5]);
        assert_eq!(field.warnings().len(), 1);
    }

    #[test]
    fn test_more_octaves_adds_detail() {
        let roughness = |octaves: u32| {
            let field = generate_noise_field(
                &NoiseParams {
                    seed: 7,
                    octaves,
                    lacunarity: 2.0,
                    ..Default::default()
                },
                128,
                1,
            );
            field
                .row(0)
                .windows(2)
                .map(|w| (w[1] - w[0]).abs())
                .sum::<f32>()
        };
        assert!(
            roughness(6) > roughness(1),
            "6 octaves should be rougher than 1 octave"
        );
    }

    #[test]
    fn test_from_config_copies_noise_settings() {
        let validated = isle_config::GenerationConfig::default().validate().unwrap();
        let params = NoiseParams::from_config(&validated);
        assert_eq!(params.seed, 1337);
        assert_eq!(params.octaves, 3);
        assert!((params.frequency - 6.4).abs() < 1e-6);
        assert!((params.persistence - 0.5).abs() < 1e-12);
    }
}
