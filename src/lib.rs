//! Core library for the YouTube downloader.
//!
//! Everything the two binaries share lives here: the yt-dlp adapter, the
//! progress-line parsing, the session state machine and the logging setup.

// External downloader spawning logic (yt-dlp)
pub mod downloader;
// Error types for the download pipeline
pub mod error;
// Logging setup shared by both binaries
pub mod logging;
// Data models for download requests, sessions and worker events
pub mod model;
// Progress parsing utilities
pub mod progress;
// Thumbnail fetching
pub mod thumbnail;
// yt-dlp self-update and the retry policy
pub mod update;

pub use error::{DownloadError, Result};
pub use model::{
    DownloadEvent, DownloadOutcome, DownloadRequest, DownloadSession, FormatSelection, StartError,
};
