//! File logging for the terminal UI
//!
//! stdout belongs to the UI, so tracing output goes to a file through a
//! non-blocking writer.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_FILE_NAME: &str = "pokedeck.log";

/// Keeps the writer thread alive; dropping it flushes pending lines.
pub struct LogGuard {
    _guard: WorkerGuard,
    pub path: PathBuf,
}

/// `<cache dir>/pokedeck/pokedeck.log`, or `None` when the platform has no cache dir.
pub fn default_log_path() -> Option<PathBuf> {
    dirs_next::cache_dir().map(|dir| dir.join("pokedeck").join(LOG_FILE_NAME))
}

/// Filter from a level or directive string, falling back to `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Returns `None` (logging off) when the file can't be opened.
pub fn init(path: Option<PathBuf>, level: &str) -> Option<LogGuard> {
    let path = path.or_else(default_log_path)?;
    let file = match open_log_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("logging disabled: cannot open {}: {err}", path.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        return None;
    }

    tracing::info!(path = %path.display(), "logging started");
    Some(LogGuard {
        _guard: guard,
        path,
    })
}
