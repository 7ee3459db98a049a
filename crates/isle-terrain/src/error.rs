//! Height field error and warning types.

/// Errors raised while combining or remapping fields.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FieldError {
    /// A value buffer did not match the declared dimensions.
    #[error("expected {expected} values for a {width}x{height} field, got {actual}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    /// Two fields that must be combined cell by cell have different shapes.
    #[error("field is {field:?} but mask is {mask:?}")]
    DimensionMismatch {
        field: (usize, usize),
        mask: (usize, usize),
    },

    /// A remap curve has no control points.
    #[error("height curve has no control points")]
    EmptyCurve,

    /// A remap curve has non-finite or unsorted control points.
    #[error("height curve control point {index} is not finite or out of order")]
    InvalidCurvePoint { index: usize },
}

/// Non-fatal conditions recorded on a field for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldWarning {
    /// Noise accumulation was flat (`max == min`); every cell was set to 0.5.
    Degenerate {
        /// The raw value shared by every cell.
        value: f64,
    },
}
