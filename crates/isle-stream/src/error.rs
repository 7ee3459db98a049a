//! Generation error types.

use isle_config::ConfigError;
use isle_terrain::FieldError;

/// Errors that stop a regeneration before any chunk is emitted.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The settings failed validation.
    #[error("invalid generation config: {0}")]
    Config(#[from] ConfigError),

    /// A shaping stage rejected its input.
    #[error("height field shaping failed: {0}")]
    Field(#[from] FieldError),
}
