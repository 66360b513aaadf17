//! Logging setup shared by the two binaries.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// GUI logging: appends timestamped, ANSI-free info/error lines to
/// `download.log` in the working directory. Falls back to stderr if the
/// file cannot be opened.
pub fn init_file_logging() {
    match OpenOptions::new()
        .create(true)
        .append(true)
        .open("download.log")
    {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .init();
        }
    }
}

/// Compact stderr logging for the command-line variant.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(io::stderr)
        .compact()
        .init();
}
