//! Lazy, cancellable chunk emission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use isle_mesh::ChunkMeshRecord;
use isle_terrain::FieldWarning;

use crate::consumer::ChunkConsumer;
use crate::run::GenerationRun;

/// Shared cancellation flag of one stream.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Chunk grid shape of a run and whether it differs from the previous run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamLayout {
    pub chunks_per_row: usize,
    pub chunk_count: usize,
    /// The host must discard chunk objects laid out for the previous grid.
    pub changed: bool,
}

/// Result of one [`ChunkStream::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamStatus {
    /// A chunk was handed to the consumer.
    Emitted { chunk_id: usize },
    /// Every chunk has been emitted.
    Complete,
    /// The stream was superseded or cancelled.
    Cancelled,
    /// No stream is active.
    Idle,
}

/// Yields the chunks of one [`GenerationRun`] in row-major order, one per
/// call, until it is exhausted or cancelled.
///
/// Cancellation is observed before each chunk; a chunk that has started
/// building is always delivered whole.
#[derive(Debug)]
pub struct ChunkStream {
    run: GenerationRun,
    cursor: usize,
    cancel: CancelToken,
    layout: StreamLayout,
    completion_reported: bool,
}

impl ChunkStream {
    pub(crate) fn new(run: GenerationRun, cancel: CancelToken, layout: StreamLayout) -> Self {
        Self {
            run,
            cursor: 0,
            cancel,
            layout,
            completion_reported: false,
        }
    }

    pub fn run(&self) -> &GenerationRun {
        &self.run
    }

    pub fn layout(&self) -> StreamLayout {
        self.layout
    }

    /// Warnings raised while shaping the field, e.g. a degenerate noise range.
    pub fn warnings(&self) -> &[FieldWarning] {
        self.run.warnings()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Number of chunks emitted so far.
    pub fn emitted(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.run.chunk_count()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.total()
    }

    /// Rewind to chunk 0, reusing the already shaped field.
    ///
    /// Has no effect on a cancelled stream.
    pub fn restart(&mut self) {
        if self.is_cancelled() {
            return;
        }
        self.cursor = 0;
        self.completion_reported = false;
    }

    /// Emit at most one chunk to `consumer`.
    ///
    /// `on_complete` fires on the tick that emits the last chunk.
    pub fn tick(&mut self, consumer: &mut dyn ChunkConsumer) -> StreamStatus {
        if self.is_cancelled() {
            return StreamStatus::Cancelled;
        }
        match self.next() {
            Some(record) => {
                let chunk_id = record.chunk_id;
                consumer.on_chunk_ready(record);
                consumer.on_progress(self.cursor, self.total());
                if self.is_finished() {
                    self.report_completion(consumer);
                }
                StreamStatus::Emitted { chunk_id }
            }
            None if self.is_finished() => {
                self.report_completion(consumer);
                StreamStatus::Complete
            }
            None => StreamStatus::Cancelled,
        }
    }

    /// Tick until the stream completes or is cancelled.
    pub fn drain_into(&mut self, consumer: &mut dyn ChunkConsumer) -> StreamStatus {
        loop {
            match self.tick(consumer) {
                StreamStatus::Emitted { .. } => continue,
                status => return status,
            }
        }
    }

    fn report_completion(&mut self, consumer: &mut dyn ChunkConsumer) {
        if !self.completion_reported {
            self.completion_reported = true;
            tracing::info!(chunks = self.total(), "terrain stream complete");
            consumer.on_complete();
        }
    }
}

impl Iterator for ChunkStream {
    type Item = ChunkMeshRecord;

    fn next(&mut self) -> Option<ChunkMeshRecord> {
        if self.is_cancelled() || self.is_finished() {
            return None;
        }
        match self.run.build_chunk(self.cursor) {
            Ok(record) => {
                self.cursor += 1;
                Some(record)
            }
            Err(err) => {
                tracing::error!(chunk_id = self.cursor, error = %err, "chunk build failed, stopping stream");
                self.cancel.cancel();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_cancelled() {
            return (0, Some(0));
        }
        let remaining = self.total().saturating_sub(self.cursor);
        (0, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle_config::GenerationConfig;

    #[derive(Default)]
    struct Recorder {
        ids: Vec<usize>,
        progress: Vec<(usize, usize)>,
        completions: usize,
    }

    impl ChunkConsumer for Recorder {
        fn on_chunk_ready(&mut self, record: ChunkMeshRecord) {
            self.ids.push(record.chunk_id);
        }

        fn on_progress(&mut self, completed: usize, total: usize) {
            self.progress.push((completed, total));
        }

        fn on_complete(&mut self) {
            self.completions += 1;
        }
    }

    fn small_stream() -> ChunkStream {
        let config = GenerationConfig {
            map_size: 40,
            chunk_size: 20,
            ..Default::default()
        };
        let run = GenerationRun::prepare(&config).unwrap();
        let layout = StreamLayout {
            chunks_per_row: 2,
            chunk_count: 4,
            changed: true,
        };
        ChunkStream::new(run, CancelToken::new(), layout)
    }

    #[test]
    fn test_tick_emits_one_chunk_at_a_time() {
        let mut stream = small_stream();
        let mut recorder = Recorder::default();
        assert_eq!(
            stream.tick(&mut recorder),
            StreamStatus::Emitted { chunk_id: 0 }
        );
        assert_eq!(recorder.ids, vec![0]);
        assert_eq!(recorder.progress, vec![(1, 4)]);
        assert_eq!(stream.emitted(), 1);
    }

    #[test]
    fn test_complete_fires_once() {
        let mut stream = small_stream();
        let mut recorder = Recorder::default();
        assert_eq!(stream.drain_into(&mut recorder), StreamStatus::Complete);
        assert_eq!(recorder.ids, vec![0, 1, 2, 3]);
        assert_eq!(recorder.completions, 1);
        assert_eq!(stream.tick(&mut recorder), StreamStatus::Complete);
        assert_eq!(recorder.completions, 1);
    }

    #[test]
    fn test_cancelled_stream_never_completes() {
        let mut stream = small_stream();
        let mut recorder = Recorder::default();
        stream.tick(&mut recorder);
        stream.cancel();
        assert_eq!(stream.tick(&mut recorder), StreamStatus::Cancelled);
        assert_eq!(stream.next(), None);
        assert_eq!(recorder.ids, vec![0]);
        assert_eq!(recorder.completions, 0);
    }

    #[test]
    fn test_restart_rewinds_cursor() {
        let mut stream = small_stream();
        let first: Vec<_> = stream.by_ref().collect();
        assert_eq!(first.len(), 4);
        stream.restart();
        let second: Vec<_> = stream.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_restart_ignored_after_cancel() {
        let mut stream = small_stream();
        stream.next();
        stream.cancel();
        stream.restart();
        assert_eq!(stream.emitted(), 1);
        assert_eq!(stream.next(), None);
    }

    #[test]
    fn test_size_hint_counts_remaining() {
        let mut stream = small_stream();
        assert_eq!(stream.size_hint(), (0, Some(4)));
        stream.next();
        assert_eq!(stream.size_hint(), (0, Some(3)));
        stream.cancel();
        assert_eq!(stream.size_hint(), (0, Some(0)));
    }
}
