//! Debug visualization: 2D previews of height fields and falloff masks.
//!
//! Hosts use these to eyeball a run's shaping stack (the island silhouette,
//! terraces, blurred coastlines) without meshing or rendering anything.

mod image;

pub use self::image::DebugImage;

use crate::falloff::FalloffMask;
use crate::height_field::HeightField;

/// Map a `[0, 1]` value to a gray level.
fn gray(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Render a height field as grayscale: 0 is black, 1 is white.
pub fn render_height_field(field: &HeightField) -> DebugImage {
    let mut image = DebugImage::new(field.width() as u32, field.height() as u32);
    for z in 0..field.height() {
        for x in 0..field.width() {
            let g = gray(field.get(x, z));
            image.set_pixel(x as u32, z as u32, g, g, g, 255);
        }
    }
    image
}

/// Render a falloff mask as grayscale: unmasked is black, fully masked white.
pub fn render_falloff_mask(mask: &FalloffMask) -> DebugImage {
    let mut image = DebugImage::new(mask.width() as u32, mask.height() as u32);
    for z in 0..mask.height() {
        for x in 0..mask.width() {
            let g = gray(mask.get(x, z));
            image.set_pixel(x as u32, z as u32, g, g, g, 255);
        }
    }
    image
}

/// Render a height field with elevation colors (see [`height_to_color`]).
pub fn render_height_field_colored(field: &HeightField) -> DebugImage {
    let mut image = DebugImage::new(field.width() as u32, field.height() as u32);
    for z in 0..field.height() {
        for x in 0..field.width() {
            let (r, g, b) = height_to_color(field.get(x, z));
            image.set_pixel(x as u32, z as u32, r, g, b, 255);
        }
    }
    image
}

/// Map a normalized height to an RGB color.
///
/// Color bands: sea → shallows → beach → lowlands → highlands → peaks.
/// A falloff-masked border sits at exactly 0 and renders as open sea.
pub fn height_to_color(normalized: f32) -> (u8, u8, u8) {
    let h = normalized.clamp(0.0, 1.0);
    if h <= 0.0 {
        (10, 40, 120)
    } else if h < 0.08 {
        (30, 90, 190)
    } else if h < 0.14 {
        (220, 200, 130)
    } else if h < 0.55 {
        let t = (h - 0.14) / 0.41;
        (
            (40.0 + t * 70.0) as u8,
            (160.0 - t * 40.0) as u8,
            (40.0 + t * 10.0) as u8,
        )
    } else if h < 0.8 {
        let t = (h - 0.55) / 0.25;
        (
            (110.0 + t * 30.0) as u8,
            (110.0 - t * 30.0) as u8,
            (70.0 + t * 10.0) as u8,
        )
    } else {
        let t = ((h - 0.8) / 0.2).min(1.0);
        let base = (170.0 + t * 85.0) as u8;
        (base, base, base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::falloff::{FalloffParams, generate_falloff_mask};

    #[test]
    fn test_height_field_render_dimensions_and_extremes() {
        let field = HeightField::new(3, 2, vec![0.0, 0.5, 1.0, 1.0, 0.5, 0.0]).unwrap();
        let image = render_height_field(&field);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(image.get_pixel(2, 0), (255, 255, 255, 255));
        assert_eq!(image.get_pixel(0, 1), (255, 255, 255, 255));
        assert_eq!(image.get_pixel(1, 0), (128, 128, 128, 255));
    }

    #[test]
    fn test_falloff_render_is_dark_in_centre() {
        let mask = generate_falloff_mask(32, 32, &FalloffParams::default());
        let image = render_falloff_mask(&mask);
        assert_eq!(image.get_pixel(16, 16), (0, 0, 0, 255));
        assert_eq!(image.get_pixel(0, 0), (255, 255, 255, 255));
    }

    #[test]
    fn test_colored_render_has_distinct_bands() {
        let values: Vec<f32> = (0..=20).map(|i| i as f32 / 20.0).collect();
        let field = HeightField::new(values.len(), 1, values).unwrap();
        let image = render_height_field_colored(&field);
        assert!(image.unique_color_count() >= 6);
    }

    #[test]
    fn test_sea_level_color() {
        assert_eq!(height_to_color(0.0), (10, 40, 120));
        assert_eq!(height_to_color(-1.0), (10, 40, 120));
    }
}
