//! Callbacks through which a host receives streamed chunks.

use isle_mesh::ChunkMeshRecord;

/// Receives the output of a [`ChunkStream`](crate::ChunkStream).
///
/// Records are moved into the consumer; the pipeline keeps no copy.
pub trait ChunkConsumer {
    /// A chunk finished building.
    fn on_chunk_ready(&mut self, record: ChunkMeshRecord);

    /// Called after every emitted chunk with the running count.
    fn on_progress(&mut self, _completed: usize, _total: usize) {}

    /// Called once, after the last chunk. Never called for a cancelled stream.
    fn on_complete(&mut self) {}
}

impl ChunkConsumer for Vec<ChunkMeshRecord> {
    fn on_chunk_ready(&mut self, record: ChunkMeshRecord) {
        self.push(record);
    }
}
