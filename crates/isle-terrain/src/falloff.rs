//! Falloff masks that push terrain toward an island silhouette.
//!
//! The mask is a pure function of cell position and the falloff settings. It
//! is 0 at the centre and approaches 1 at the edges; subtracting it from the
//! noise field sinks the border below sea level.

use isle_config::{FalloffShape, ValidatedConfig};

use crate::error::FieldError;
use crate::height_field::HeightField;

/// Falloff mask settings.
#[derive(Clone, Debug, PartialEq)]
pub struct FalloffParams {
    /// Curve steepness (`a`).
    pub a: f32,
    /// Curve shift (`b`). Larger values keep more of the interior above water.
    pub b: f32,
    /// Distance metric from the centre.
    pub shape: FalloffShape,
    /// Gaussian blur radius in cells, or `None` to skip blurring.
    pub blur_radius: Option<usize>,
}

impl FalloffParams {
    /// Falloff settings of a validated generation config.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let settings = config.config();
        Self {
            a: settings.falloff_a,
            b: settings.falloff_b,
            shape: settings.falloff_shape,
            blur_radius: settings.use_blur.then(|| config.blur_radius()),
        }
    }
}

impl Default for FalloffParams {
    fn default() -> Self {
        Self {
            a: 3.0,
            b: 2.2,
            shape: FalloffShape::Square,
            blur_radius: None,
        }
    }
}

/// A row-major mask of values in `[0, 1]`, same layout as [`HeightField`].
#[derive(Clone, Debug, PartialEq)]
pub struct FalloffMask {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl FalloffMask {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Mask value at column `x`, row `z`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `z >= height`.
    pub fn get(&self, x: usize, z: usize) -> f32 {
        assert!(x < self.width && z < self.height);
        self.values[z * self.width + x]
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Evaluate the falloff curve `d^a / (d^a + (b - b*d)^a)` at distance `d`.
///
/// `d` is clamped to `[0, 1]` and a negative `b - b*d` term is clamped to 0.
/// Where the quotient is undefined the result snaps to the nearer end.
pub fn falloff_value(d: f32, a: f32, b: f32) -> f32 {
    let d = d.clamp(0.0, 1.0);
    let near = libm::powf(d, a);
    let far = libm::powf((b - b * d).max(0.0), a);
    let denom = near + far;

    if denom > 0.0 && denom.is_finite() {
        (near / denom).clamp(0.0, 1.0)
    } else if d >= 0.5 {
        1.0
    } else {
        0.0
    }
}

/// Normalized distance of cell `(i, j)` from the field centre.
fn centre_distance(shape: FalloffShape, i: usize, j: usize, width: usize, height: usize) -> f32 {
    let x = (i as f32 / width as f32 * 2.0 - 1.0).abs();
    let y = (j as f32 / height as f32 * 2.0 - 1.0).abs();
    match shape {
        FalloffShape::Square => x.max(y),
        FalloffShape::Radial => libm::sqrtf(x * x + y * y).min(1.0),
    }
}

/// Generate a `width x height` falloff mask, blurring it if requested.
pub fn generate_falloff_mask(width: usize, height: usize, params: &FalloffParams) -> FalloffMask {
    let mut values = Vec::with_capacity(width * height);
    for j in 0..height {
        for i in 0..width {
            let d = centre_distance(params.shape, i, j, width, height);
            values.push(falloff_value(d, params.a, params.b));
        }
    }

    let mut mask = FalloffMask {
        width,
        height,
        values,
    };

    if let Some(radius) = params.blur_radius {
        let kernel = GaussianKernel::new(radius);
        mask = kernel.blur(&mask);
    }

    tracing::debug!(
        width,
        height,
        shape = ?params.shape,
        blur_radius = ?params.blur_radius,
        "generated falloff mask"
    );

    mask
}

/// Subtract `mask` from `field` cell by cell, clamping to `[0, 1]`.
pub fn apply_falloff(field: &HeightField, mask: &FalloffMask) -> Result<HeightField, FieldError> {
    if field.dimensions() != mask.dimensions() {
        return Err(FieldError::DimensionMismatch {
            field: field.dimensions(),
            mask: mask.dimensions(),
        });
    }

    let mut masked = mask.values.iter();
    Ok(field.map(|h| {
        let m = masked.next().copied().unwrap_or(0.0);
        (h - m).clamp(0.0, 1.0)
    }))
}

// ---------------------------------------------------------------------------
// Gaussian blur
// ---------------------------------------------------------------------------

/// One-sided Gaussian kernel `w[k] = exp(-k^2 / 2σ^2) / (2πσ^2)` for
/// `k in 0..=radius`, with `σ = radius / 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    radius: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Precompute the kernel for `radius`. Radius 0 is the identity kernel.
    pub fn new(radius: usize) -> Self {
        if radius == 0 {
            return Self {
                radius,
                weights: vec![1.0],
            };
        }

        let sigma = radius as f32 / 3.0;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let weights = (0..=radius)
            .map(|k| {
                let k = k as f32;
                libm::expf(-(k * k) / two_sigma_sq) / (std::f32::consts::PI * two_sigma_sq)
            })
            .collect();

        Self { radius, weights }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// One-sided weights, indexed by `|offset|`.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Every tap of the kernel centred on `center` in a line of `len` samples,
    /// as `(clamped_index, raw_weight)`. Out-of-range taps clamp to the edge
    /// sample and keep their full weight.
    fn taps(&self, center: usize, len: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let r = self.radius as isize;
        let last = len.saturating_sub(1) as isize;
        (-r..=r).map(move |k| {
            let idx = (center as isize + k).clamp(0, last) as usize;
            (idx, self.weights[k.unsigned_abs()])
        })
    }

    /// The normalized weights applied to each source index when blurring
    /// sample `center` of a line of `len` samples. Clamped taps landing on
    /// the same index are merged. The weights sum to 1.
    pub fn effective_weights(&self, center: usize, len: usize) -> Vec<(usize, f32)> {
        let total: f32 = self.taps(center, len).map(|(_, w)| w).sum();
        let mut merged: Vec<(usize, f32)> = Vec::with_capacity(2 * self.radius + 1);
        for (idx, w) in self.taps(center, len) {
            match merged.last_mut() {
                Some((last, acc)) if *last == idx => *acc += w,
                _ => merged.push((idx, w)),
            }
        }
        if total > 0.0 {
            for (_, w) in &mut merged {
                *w /= total;
            }
        }
        merged
    }

    /// Normalized weights for every position of a line of `len` samples.
    fn line_weights(&self, len: usize) -> Vec<Vec<(usize, f32)>> {
        (0..len).map(|center| self.effective_weights(center, len)).collect()
    }

    /// Separable blur: a horizontal pass, then a vertical pass over its result.
    /// Edges clamp rather than wrap.
    pub fn blur(&self, mask: &FalloffMask) -> FalloffMask {
        let (width, height) = mask.dimensions();
        if width == 0 || height == 0 {
            return mask.clone();
        }

        let row_weights = self.line_weights(width);
        let mut horizontal = Vec::with_capacity(width * height);
        for j in 0..height {
            let row = &mask.values[j * width..(j + 1) * width];
            for weights in &row_weights {
                horizontal.push(convolve(weights, |x| row[x]));
            }
        }

        let column_weights = self.line_weights(height);
        let mut vertical = Vec::with_capacity(width * height);
        for weights in &column_weights {
            for i in 0..width {
                vertical.push(convolve(weights, |z| horizontal[z * width + i]));
            }
        }

        FalloffMask {
            width,
            height,
            values: vertical,
        }
    }
}

/// Weighted sum of `sample` over normalized `weights`.
fn convolve(weights: &[(usize, f32)], sample: impl Fn(usize) -> f32) -> f32 {
    weights
        .iter()
        .map(|&(idx, w)| sample(idx) * w)
        .sum::<f32>()
        .clamp(0.0, 1.0)
}
