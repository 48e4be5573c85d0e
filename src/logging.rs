//! Logging setup for odbc-cell.
//!
//! Logs go to stderr so they never mix with result output on stdout. With
//! `--log-file` they are appended to `odbc-cell.log` in the platform state
//! directory instead.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "odbc-cell.log";

/// `RUST_LOG` wins; otherwise `debug` with `--debug`, else `info`.
fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Logs to the file at [`get_log_path`], or to stderr if it cannot be opened.
pub fn init_file_logging(debug: bool) {
    let log_path = get_log_path();
    match open_log_file(&log_path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter(debug))
            .with_writer(file)
            .with_ansi(false)
            .init(),
        Err(e) => {
            eprintln!("Warning: cannot log to {}: {e}", log_path.display());
            init_stderr_logging(debug);
        }
    }
}

/// Logs to stderr.
pub fn init_stderr_logging(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(io::stderr)
        .init();
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `<state_dir>/odbc-cell/odbc-cell.log`, falling back to the config
/// directory and then the temp directory.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("odbc-cell").join(LOG_FILE_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME))
}
