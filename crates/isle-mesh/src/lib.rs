//! Chunk tessellation: turns a shared height field into per-chunk vertex,
//! triangle, and UV buffers that tile seamlessly.

pub mod chunk;
pub mod chunk_mesh;

pub use chunk::{ChunkCoord, ChunkEdge};
pub use chunk_mesh::{ChunkMeshBuilder, ChunkMeshRecord, MeshError};
