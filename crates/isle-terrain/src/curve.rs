//! Piecewise-linear height remapping.

use isle_config::HeightCurve;

use crate::error::FieldError;
use crate::height_field::HeightField;

/// Check that the curve has at least one point and that its inputs are finite
/// and non-decreasing.
pub fn validate_curve(curve: &HeightCurve) -> Result<(), FieldError> {
    if curve.points.is_empty() {
        return Err(FieldError::EmptyCurve);
    }
    let mut previous = f32::NEG_INFINITY;
    for (index, &[input, output]) in curve.points.iter().enumerate() {
        if !input.is_finite() || !output.is_finite() || input < previous {
            return Err(FieldError::InvalidCurvePoint { index });
        }
        previous = input;
    }
    Ok(())
}

/// Evaluate a validated curve at `x`. Inputs outside the control range take
/// the nearest end point's output.
pub fn evaluate_curve(points: &[[f32; 2]], x: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return x;
    };
    if x <= first[0] {
        return first[1];
    }
    if x >= last[0] {
        return last[1];
    }

    // First point strictly right of x; x > first[0] so upper >= 1.
    let upper = points.partition_point(|p| p[0] <= x);
    let [x0, y0] = points[upper - 1];
    let [x1, y1] = points[upper];
    let span = x1 - x0;
    if span <= 0.0 {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / span
}

/// Remap every cell through `curve`, clamping to `[0, 1]`.
pub fn remap_heights(field: &HeightField, curve: &HeightCurve) -> Result<HeightField, FieldError> {
    validate_curve(curve)?;
    tracing::debug!(points = curve.points.len(), "remapping heights");
    Ok(field.map(|v| evaluate_curve(&curve.points, v).clamp(0.0, 1.0)))
}
