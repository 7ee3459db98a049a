//! Plateau shaping: banding heights into terraces with eased transitions.

use isle_config::GenerationConfig;

use crate::height_field::HeightField;

/// Plateau band edges and smoothing.
#[derive(Clone, Debug, PartialEq)]
pub struct PlateauParams {
    /// Upper edges of the four bands, `p1 <= p2 <= p3 <= p4`.
    pub thresholds: [f32; 4],
    /// 0 snaps every banded value to its edge, 1 leaves it unchanged.
    pub smoothing: f32,
}

impl PlateauParams {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            thresholds: config.plateau_thresholds,
            smoothing: config.plateau_smoothing,
        }
    }
}

impl Default for PlateauParams {
    fn default() -> Self {
        Self {
            thresholds: [0.2, 0.4, 0.6, 0.9],
            smoothing: 0.5,
        }
    }
}

/// Hermite ease `3t^2 - 2t^3` of `t` clamped to `[0, 1]`. NaN eases as 0.
fn smoothstep(t: f32) -> f32 {
    if t.is_nan() {
        return 0.0;
    }
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Shape a single value.
///
/// The value is assigned to the first band whose upper edge it does not
/// exceed and eased toward that edge; values above the last edge pass
/// through unchanged. The result always lies between the value and its edge.
pub fn plateau_value(v: f32, thresholds: &[f32; 4], smoothing: f32) -> f32 {
    let Some(&edge) = thresholds.iter().find(|&&edge| v <= edge) else {
        return v;
    };
    edge + (v - edge) * smoothstep(smoothing)
}

/// Apply [`plateau_value`] to every cell, clamping the result to `[0, 1]`.
pub fn shape_plateaus(field: &HeightField, params: &PlateauParams) -> HeightField {
    tracing::debug!(
        thresholds = ?params.thresholds,
        smoothing = params.smoothing,
        "shaping plateaus"
    );
    field.map(|v| plateau_value(v, &params.thresholds, params.smoothing).clamp(0.0, 1.0))
}
