//! Generation settings for the isle terrain pipeline.
//!
//! Holds the immutable [`GenerationConfig`] consumed by a generation run,
//! validates it before any work starts, and persists it to disk as RON with
//! forward/backward compatible defaults. CLI overrides are applied via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, FalloffShape, GenerationConfig, HeightCurve, TilingMode, ValidatedConfig,
};
pub use error::ConfigError;
