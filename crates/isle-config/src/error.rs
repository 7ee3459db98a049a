//! Configuration error types.

/// Errors raised while validating, loading, or saving a [`GenerationConfig`](crate::GenerationConfig).
///
/// Validation variants are raised synchronously before any generation work
/// starts; a config that fails validation is never partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `chunk_size` was zero or negative.
    #[error("chunk size must be positive, got {0}")]
    ChunkSizeNotPositive(i32),

    /// `map_size` was not a positive multiple of `chunk_size`.
    #[error("map size {map_size} is not a positive multiple of chunk size {chunk_size}")]
    MapSizeNotMultiple { map_size: i32, chunk_size: i32 },

    /// `octaves` was zero or negative.
    #[error("octave count must be positive, got {0}")]
    OctavesNotPositive(i32),

    /// `blur_radius` was negative.
    #[error("blur radius must not be negative, got {0}")]
    NegativeBlurRadius(i32),

    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
