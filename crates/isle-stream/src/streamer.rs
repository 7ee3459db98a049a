//! Entry point for hosts that regenerate terrain on demand.

use isle_config::GenerationConfig;

use crate::consumer::ChunkConsumer;
use crate::error::GenerationError;
use crate::run::GenerationRun;
use crate::stream::{CancelToken, ChunkStream, StreamLayout, StreamStatus};

/// Starts regenerations and guarantees at most one live [`ChunkStream`].
///
/// Hosts either take the stream from [`regenerate`](Self::regenerate) and
/// pull it themselves, or [`start`](Self::start) it inside the streamer and
/// call [`tick`](Self::tick) once per frame.
#[derive(Debug, Default)]
pub struct TerrainStreamer {
    current: Option<CancelToken>,
    active: Option<ChunkStream>,
    last_chunks_per_row: Option<usize>,
    runs_started: u64,
}

impl TerrainStreamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape a new field for `config` and return its chunk stream.
    ///
    /// The field is fully shaped before the previous stream is touched, so
    /// a rejected config leaves the stream in flight running. On success
    /// the previous stream is cancelled and yields nothing further.
    pub fn regenerate(&mut self, config: &GenerationConfig) -> Result<ChunkStream, GenerationError> {
        let run = GenerationRun::prepare(config)?;
        self.cancel();

        let chunks_per_row = run.chunks_per_row();
        let changed = self.last_chunks_per_row != Some(chunks_per_row);
        if changed {
            tracing::debug!(
                previous = ?self.last_chunks_per_row,
                chunks_per_row,
                "chunk layout changed"
            );
        }
        self.last_chunks_per_row = Some(chunks_per_row);
        self.runs_started += 1;

        let layout = StreamLayout {
            chunks_per_row,
            chunk_count: run.chunk_count(),
            changed,
        };
        let token = CancelToken::new();
        self.current = Some(token.clone());
        Ok(ChunkStream::new(run, token, layout))
    }

    /// Like [`regenerate`](Self::regenerate), but keeps the stream inside the
    /// streamer for [`tick`](Self::tick). Returns the new layout.
    pub fn start(&mut self, config: &GenerationConfig) -> Result<StreamLayout, GenerationError> {
        let stream = self.regenerate(config)?;
        let layout = stream.layout();
        self.active = Some(stream);
        Ok(layout)
    }

    /// Advance the stream held by the streamer by one chunk.
    pub fn tick(&mut self, consumer: &mut dyn ChunkConsumer) -> StreamStatus {
        let Some(stream) = self.active.as_mut() else {
            return StreamStatus::Idle;
        };
        let status = stream.tick(consumer);
        if matches!(status, StreamStatus::Complete | StreamStatus::Cancelled) {
            self.active = None;
        }
        status
    }

    /// Cancel the most recent stream, wherever it is held.
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            if !token.is_cancelled() {
                tracing::debug!("cancelling in-flight terrain stream");
            }
            token.cancel();
        }
        self.active = None;
    }

    /// The stream held by the streamer, if any.
    pub fn active(&self) -> Option<&ChunkStream> {
        self.active.as_ref()
    }

    /// Number of successful regenerations.
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }
}
