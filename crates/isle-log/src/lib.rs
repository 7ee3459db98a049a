//! Structured logging for isle hosts.
//!
//! The pipeline crates emit `tracing` events; this crate installs the
//! subscriber that prints them. Console output carries uptime timestamps and
//! module paths, and debug builds can additionally write JSON lines to a file
//! for post-mortem analysis of a generation run.

use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "isle.log";

/// Initialize the global tracing subscriber.
///
/// - `log_dir`: directory for the JSON log file (debug builds only)
/// - `debug_build`: enables the file layer
/// - `level`: filter string overriding [`DEFAULT_FILTER`]; `RUST_LOG` wins over both
///
/// Returns `false` if a global subscriber was already installed.
///
/// # Examples
///
/// ```no_run
/// use isle_log::init_logging;
///
/// init_logging(None, false, Some("debug,isle_mesh=trace"));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, level: Option<&str>) -> bool {
    // RUST_LOG overrides the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(level)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber.with(file_layer).try_init().is_ok();
    }

    subscriber.try_init().is_ok()
}

/// The filter directive used when `RUST_LOG` is unset: `level` if given and
/// non-blank, otherwise [`DEFAULT_FILTER`].
fn level_directive(level: Option<&str>) -> &str {
    level
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_FILTER)
}
