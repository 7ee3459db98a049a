//! Dense, immutable 2D array of normalized heights.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::{FieldError, FieldWarning};

/// A row-major `width x height` array of heights in `[0, 1]`.
///
/// Rows run along `z`, columns along `x`: `get(x, z)` reads
/// `values[z * width + x]`. Shaping stages never mutate a field in place;
/// they return a new one, carrying over any recorded warnings.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
    warnings: Vec<FieldWarning>,
}

impl HeightField {
    /// Wrap a row-major buffer. Fails if `values.len() != width * height`.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self, FieldError> {
        let expected = width * height;
        if values.len() != expected {
            return Err(FieldError::LengthMismatch {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            width,
            height,
            values,
            warnings: Vec::new(),
        })
    }

    /// A field with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
            warnings: Vec::new(),
        }
    }

    pub(crate) fn from_parts(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn with_warning(mut self, warning: FieldWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    /// Build a new field of the same shape by mapping every cell.
    pub(crate) fn map(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            values: self.values.iter().map(|&v| f(v)).collect(),
            warnings: self.warnings.clone(),
        }
    }

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

    /// Height at column `x`, row `z`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `z >= height`.
    pub fn get(&self, x: usize, z: usize) -> f32 {
        assert!(
            x < self.width && z < self.height,
            "({x}, {z}) outside {}x{} field",
            self.width,
            self.height
        );
        self.values[z * self.width + x]
    }

    /// Height at column `x`, row `z`, or `None` when out of bounds.
    pub fn try_get(&self, x: usize, z: usize) -> Option<f32> {
        (x < self.width && z < self.height).then(|| self.values[z * self.width + x])
    }

    /// One row of the field.
    pub fn row(&self, z: usize) -> &[f32] {
        &self.values[z * self.width..(z + 1) * self.width]
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Warnings recorded while producing this field.
    pub fn warnings(&self) -> &[FieldWarning] {
        &self.warnings
    }

    /// Smallest and largest value, or `None` for an empty field.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Hash of the shape and the exact bit pattern of every value.
    ///
    /// Two runs with identical settings must produce identical hashes.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.width.hash(&mut hasher);
        self.height.hash(&mut hasher);
        for v in &self.values {
            v.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = HeightField::new(3, 3, vec![0.0; 8]);
        assert_eq!(
            result,
            Err(FieldError::LengthMismatch {
                width: 3,
                height: 3,
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn test_row_major_indexing() {
        let field = HeightField::new(3, 2, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        assert_eq!(field.get(2, 0), 0.2);
        assert_eq!(field.get(0, 1), 0.3);
        assert_eq!(field.row(1), &[0.3, 0.4, 0.5]);
        assert_eq!(field.try_get(3, 0), None);
        assert_eq!(field.try_get(1, 2), None);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        HeightField::filled(2, 2, 0.5).get(2, 0);
    }

    #[test]
    fn test_min_max() {
        let field = HeightField::new(2, 2, vec![0.4, 0.1, 0.9, 0.5]).unwrap();
        assert_eq!(field.min_max(), Some((0.1, 0.9)));
        assert_eq!(HeightField::filled(0, 0, 0.0).min_max(), None);
    }

    #[test]
    fn test_map_preserves_shape_and_warnings() {
        let field =
            HeightField::filled(4, 2, 0.5).with_warning(FieldWarning::Degenerate { value: 1.0 });
        let doubled = field.map(|v| v * 2.0);
        assert_eq!(doubled.dimensions(), (4, 2));
        assert!(doubled.values().iter().all(|&v| v == 1.0));
        assert_eq!(doubled.warnings(), field.warnings());
    }

    #[test]
    fn test_content_hash_tracks_values() {
        let a = HeightField::filled(4, 4, 0.25);
        let b = HeightField::filled(4, 4, 0.25);
        let c = HeightField::filled(4, 4, 0.26);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }
}
