//! yt-dlp adapter: builds the argument vector for a request, spawns the
//! external tool and relays its output as [`DownloadEvent`]s.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
    sync::mpsc::UnboundedSender,
};
use tracing::{error, info};

use crate::error::{DownloadError, Result};
use crate::model::{DownloadEvent, DownloadRequest, FormatSelection};
use crate::progress::{self, PROGRESS_TEMPLATE, ProgressUpdate};

/// Checks that the yt-dlp executable is reachable on PATH.
pub async fn check_ytdlp() -> bool {
    Command::new("yt-dlp")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Output filename template per selection. The video id (and, for merged
/// downloads, the resolution) keeps repeated downloads of different
/// renditions of the same video from colliding.
fn output_template(selection: FormatSelection) -> &'static str {
    match selection {
        FormatSelection::VideoAndAudio => "%(id)s_%(resolution)s.%(ext)s",
        FormatSelection::VideoOnly => "%(id)s_video.%(ext)s",
        FormatSelection::AudioOnly => "%(id)s_audio.%(ext)s",
    }
}

/// Full argument vector for one request. Pure, so the format mapping can
/// be asserted in tests.
pub fn ytdlp_args(request: &DownloadRequest) -> Vec<String> {
    let mut args: Vec<String> = match request.selection {
        // Separate best streams merged into a fixed container
        FormatSelection::VideoAndAudio => vec![
            "-f".to_owned(),
            "bestvideo+bestaudio/best".to_owned(),
            "--merge-output-format".to_owned(),
            "mp4".to_owned(),
        ],
        FormatSelection::VideoOnly => vec!["-f".to_owned(), "bestvideo".to_owned()],
        // Fixed-codec audio extraction at a fixed quality
        FormatSelection::AudioOnly => vec![
            "-f".to_owned(),
            "bestaudio/best".to_owned(),
            "-x".to_owned(),
            "--audio-format".to_owned(),
            "mp3".to_owned(),
            "--audio-quality".to_owned(),
            "192K".to_owned(),
        ],
    };

    args.push("--newline".to_owned());
    args.push("--progress-template".to_owned());
    args.push(PROGRESS_TEMPLATE.to_owned());

    args.push("-o".to_owned());
    args.push(
        request
            .output_dir
            .join(output_template(request.selection))
            .to_string_lossy()
            .into_owned(),
    );
    args.push(request.url.clone());
    args
}

/// Creates the download directory if absent. Safe to call repeatedly.
pub fn ensure_output_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

/// Runs one download attempt to completion on the caller's execution
/// context, relaying progress events as they arrive. Returns the path of
/// the written file.
pub async fn run_download(
    request: &DownloadRequest,
    events: &UnboundedSender<DownloadEvent>,
) -> Result<PathBuf> {
    if !check_ytdlp().await {
        return Err(DownloadError::ToolNotFound);
    }

    ensure_output_dir(&request.output_dir)?;

    let mut child = Command::new("yt-dlp")
        .args(ytdlp_args(request))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Collect ERROR lines off stderr while stdout is streamed below
    let stderr = child.stderr.take().unwrap();
    let stderr_task = tokio::spawn(async move {
        let mut errors = Vec::new();
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.contains("ERROR") {
                errors.push(line);
            }
        }
        errors.join("\n")
    });

    let out = child.stdout.take().unwrap();
    let mut lines = BufReader::new(out).lines();
    // The last destination wins: merge/extract steps report the final file
    // after the per-stream destinations.
    let mut output_path: Option<PathBuf> = None;
    while let Some(line) = lines.next_line().await? {
        if let Some(update) = progress::parse_progress_line(&line) {
            let event = match update {
                ProgressUpdate::Downloading {
                    downloaded_bytes,
                    total_bytes,
                } => DownloadEvent::Progress {
                    downloaded_bytes,
                    total_bytes,
                },
                ProgressUpdate::Finished => DownloadEvent::Processing,
            };
            // A closed receiver just means the shell quit; keep downloading
            let _ = events.send(event);
        } else if let Some(path) = progress::parse_destination_line(&line) {
            output_path = Some(path);
        }
    }

    let status = child.wait().await?;
    let error_text = stderr_task.await.unwrap_or_default();

    if !status.success() {
        let message = if error_text.is_empty() {
            format!("yt-dlp exited with {status}")
        } else {
            error_text
        };
        return Err(DownloadError::Download(message));
    }

    output_path.ok_or(DownloadError::MissingOutputPath)
}

/// GUI worker entry point: runs one download and reports the terminal
/// result as a final event instead of a return value.
pub async fn spawn_download(request: DownloadRequest, events: UnboundedSender<DownloadEvent>) {
    match run_download(&request, &events).await {
        Ok(path) => {
            info!("Downloaded at: {}", path.display());
            let _ = events.send(DownloadEvent::Completed(path));
        }
        Err(e) => {
            error!("Error downloading: {e}");
            let _ = events.send(DownloadEvent::Failed(e.to_string()));
        }
    }
}
