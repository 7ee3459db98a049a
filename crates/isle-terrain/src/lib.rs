//! Height field synthesis: fractal noise, falloff masks, plateau shaping, and remap curves.
//!
//! Every stage is a pure function from an immutable [`HeightField`] (or the
//! generation settings) to a fresh one, so a run can share its field by
//! reference while chunks are meshed.

mod curve;
mod error;
mod falloff;
mod height_field;
mod noise_field;
mod plateau;

pub mod debug_viz;

pub use curve::{evaluate_curve, remap_heights, validate_curve};
pub use error::{FieldError, FieldWarning};
pub use falloff::{
    FalloffMask, FalloffParams, GaussianKernel, apply_falloff, falloff_value, generate_falloff_mask,
};
pub use height_field::HeightField;
pub use noise_field::{NOISE_PERMUTATION_SEED, NoiseParams, generate_noise_field};
pub use plateau::{PlateauParams, plateau_value, shape_plateaus};
