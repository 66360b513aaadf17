//! Data models for download requests, the single active session and the
//! events the background worker sends back to the interaction shell.

use std::path::PathBuf;

use crate::progress;

/// Which streams the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelection {
    /// Best video and audio streams, merged into one mp4
    VideoAndAudio,
    /// Best video-only stream
    VideoOnly,
    /// Best audio stream, transcoded to mp3
    AudioOnly,
}

impl FormatSelection {
    /// Human-readable name used in status lines and notices
    pub fn label(self) -> &'static str {
        match self {
            FormatSelection::VideoAndAudio => "Video & Audio",
            FormatSelection::VideoOnly => "Video Only",
            FormatSelection::AudioOnly => "Audio Only",
        }
    }
}

/// Everything needed to start one download; immutable once started.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Source video URL as typed by the user
    pub url: String,
    /// Requested stream selection
    pub selection: FormatSelection,
    /// Directory the output file is written into
    pub output_dir: PathBuf,
}

/// Events emitted by the background worker, delivered over a channel so the
/// shell applies them on its own thread, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    /// Raw transfer progress as reported by yt-dlp
    Progress {
        downloaded_bytes: u64,
        /// Known or estimated total; None when yt-dlp cannot tell
        total_bytes: Option<u64>,
    },
    /// Raw transfer done; yt-dlp may still be merging or transcoding
    Processing,
    /// Final file written at the given path
    Completed(PathBuf),
    /// Download failed with the underlying error text
    Failed(String),
}

/// Terminal result of a session, handed to the shell to show a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    Completed(PathBuf),
    Failed(String),
}

/// Reasons a request is rejected before any worker is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// The URL field was empty
    EmptyUrl,
    /// Another download is already in flight
    AlreadyDownloading,
}

/// Mutable state of the single active download, owned by the shell.
///
/// Only [`DownloadSession::try_start`] and [`DownloadSession::apply`]
/// mutate it; at most one session is in flight per process.
#[derive(Debug)]
pub struct DownloadSession {
    in_flight: bool,
    selection: FormatSelection,
    /// Bytes transferred so far
    pub downloaded_bytes: u64,
    /// Known or estimated total size, if any
    pub total_bytes: Option<u64>,
    /// Progress bar value in the 0..=100 range
    pub percent: f32,
    /// Status label text
    pub status_line: String,
    outcome: Option<DownloadOutcome>,
}

impl Default for DownloadSession {
    fn default() -> Self {
        Self {
            in_flight: false,
            selection: FormatSelection::VideoAndAudio,
            downloaded_bytes: 0,
            total_bytes: None,
            percent: 0.0,
            status_line: String::new(),
            outcome: None,
        }
    }
}

impl DownloadSession {
    /// Whether a download is currently running
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Guard for the trigger action: rejects empty URLs and double starts
    /// without touching any other state. On success the counters are reset
    /// and the session enters the downloading state.
    pub fn try_start(
        &mut self,
        url: &str,
        selection: FormatSelection,
    ) -> std::result::Result<(), StartError> {
        if self.in_flight {
            return Err(StartError::AlreadyDownloading);
        }
        if url.trim().is_empty() {
            return Err(StartError::EmptyUrl);
        }
        self.in_flight = true;
        self.selection = selection;
        self.downloaded_bytes = 0;
        self.total_bytes = None;
        self.percent = 0.0;
        self.status_line = format!("Starting download: {}...", selection.label());
        self.outcome = None;
        Ok(())
    }

    /// Applies one worker event. Terminal events free the session so the
    /// user may retry right away.
    pub fn apply(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Progress {
                downloaded_bytes,
                total_bytes,
            } => {
                self.downloaded_bytes = downloaded_bytes;
                self.total_bytes = total_bytes;
                match total_bytes {
                    Some(total) => {
                        self.percent = progress::percent(downloaded_bytes, total);
                        self.status_line = format!(
                            "Downloading: {:.1} MB of {:.1} MB",
                            progress::megabytes(downloaded_bytes),
                            progress::megabytes(total),
                        );
                    }
                    // No usable total: show the cumulative count only
                    None => {
                        self.status_line =
                            format!("Downloaded: {:.1} MB", progress::megabytes(downloaded_bytes));
                    }
                }
            }
            DownloadEvent::Processing => {
                self.status_line = "Processing download...".to_string();
            }
            DownloadEvent::Completed(path) => {
                self.percent = 100.0;
                self.status_line = format!("{} download complete!", self.selection.label());
                self.in_flight = false;
                self.outcome = Some(DownloadOutcome::Completed(path));
            }
            DownloadEvent::Failed(message) => {
                self.status_line = "Download failed".to_string();
                self.in_flight = false;
                self.outcome = Some(DownloadOutcome::Failed(message));
            }
        }
    }

    /// Hands the terminal outcome to the shell exactly once.
    pub fn take_outcome(&mut self) -> Option<DownloadOutcome> {
        self.outcome.take()
    }
}
