//! Headless demo that generates one island and streams its chunk meshes.
//!
//! Configuration is loaded from `terrain.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p isle-demo -- --seed 42 --plateaus true`.
//! Pass `--preview-dir out` to write PNG previews of the shaped field.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use isle_config::{CliArgs, GenerationConfig};
use isle_mesh::ChunkMeshRecord;
use isle_stream::{ChunkConsumer, ChunkStream, StreamStatus, TerrainStreamer};
use isle_terrain::debug_viz;
use tracing::{error, info};

/// Tallies the streamed meshes the way a renderer would upload them.
#[derive(Default)]
struct MeshTally {
    chunks: usize,
    vertices: usize,
    triangles: usize,
    bytes: usize,
    peak_height: f32,
}

impl ChunkConsumer for MeshTally {
    fn on_chunk_ready(&mut self, record: ChunkMeshRecord) {
        self.chunks += 1;
        self.vertices += record.vertex_count();
        self.triangles += record.triangle_count();
        self.bytes +=
            record.position_bytes().len() + record.index_bytes().len() + record.uv_bytes().len();
        let peak = record.vertices.iter().map(|v| v[1]).fold(0.0, f32::max);
        self.peak_height = self.peak_height.max(peak);
        tracing::debug!(
            chunk_id = record.chunk_id,
            placement = ?record.world_placement(),
            "chunk ready"
        );
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        if completed % 5 == 0 || completed == total {
            info!("Streamed {completed}/{total} chunks");
        }
    }

    fn on_complete(&mut self) {
        info!(
            "Island complete: {} chunks, {} vertices, {} triangles, {} KiB of buffers, peak height {:.2}",
            self.chunks,
            self.vertices,
            self.triangles,
            self.bytes / 1024,
            self.peak_height
        );
    }
}

fn resolve_config_dir(args: &CliArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("isle"))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn write_previews(stream: &ChunkStream, dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        error!("Failed to create preview directory {}: {e}", dir.display());
        return;
    }

    let run = stream.run();
    let mut images = vec![
        ("height.png", debug_viz::render_height_field(run.height_field())),
        (
            "height_colored.png",
            debug_viz::render_height_field_colored(run.height_field()),
        ),
    ];
    if let Some(mask) = run.falloff_mask() {
        images.push(("falloff.png", debug_viz::render_falloff_mask(mask)));
    }

    for (name, image) in images {
        let path = dir.join(name);
        match image.save_png(&path) {
            Ok(()) => info!("Wrote preview {}", path.display()),
            Err(e) => error!("Failed to write preview {}: {e}", path.display()),
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = resolve_config_dir(&args);

    // Load or create config, then apply CLI overrides
    let mut config = GenerationConfig::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        GenerationConfig::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    isle_log::init_logging(
        Some(&log_dir),
        cfg!(debug_assertions),
        args.log_level.as_deref(),
    );

    let mut streamer = TerrainStreamer::new();
    let mut stream = match streamer.regenerate(&config) {
        Ok(stream) => stream,
        Err(e) => {
            error!("Terrain generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let layout = stream.layout();
    info!(
        "Generating seed {} as {}x{} chunks of {} cells ({} us shaping)",
        config.seed,
        layout.chunks_per_row,
        layout.chunks_per_row,
        config.chunk_size,
        stream.run().prepare_time_us
    );

    if let Some(dir) = &args.preview_dir {
        write_previews(&stream, dir);
    }

    // One chunk per host tick
    let mut tally = MeshTally::default();
    loop {
        match stream.tick(&mut tally) {
            StreamStatus::Emitted { .. } => {}
            StreamStatus::Complete => break,
            status => {
                error!("Terrain stream stopped early: {status:?}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
