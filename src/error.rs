use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DownloadError>;

/// Failures surfaced by the yt-dlp adapter.
///
/// `Download` carries the tool's own error text and covers everything the
/// tool could not resolve, retrieve or transcode; the remaining variants are
/// unexpected failures in this layer.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// yt-dlp is not installed or not reachable on PATH
    #[error("yt-dlp not found. Please install yt-dlp first.")]
    ToolNotFound,

    /// The child process could not be spawned or awaited
    #[error("failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),

    /// yt-dlp itself reported a failed download
    #[error("download failed: {0}")]
    Download(String),

    /// The tool exited cleanly but never reported a destination file
    #[error("yt-dlp did not report an output file")]
    MissingOutputPath,
}
