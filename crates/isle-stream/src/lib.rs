//! Incremental terrain regeneration.
//!
//! A regenerate request computes the shaped height field up front, then
//! hands back a [`ChunkStream`]: a lazy, finite, row-major sequence of chunk
//! meshes that the host pulls one chunk per scheduling tick. Starting a new
//! regeneration cancels the stream of the previous one.

mod consumer;
mod error;
mod run;
mod stream;
mod streamer;

pub use consumer::ChunkConsumer;
pub use error::GenerationError;
pub use run::GenerationRun;
pub use stream::{CancelToken, ChunkStream, StreamLayout, StreamStatus};
pub use streamer::TerrainStreamer;

pub use isle_mesh::{ChunkCoord, ChunkMeshRecord};
