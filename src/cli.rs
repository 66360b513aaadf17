//! Command-line variant: prompt for a URL and stream choice, download
//! sequentially, update yt-dlp and retry once on failure.

use std::io::Write;

use dialoguer::Input;
use tokio::sync::mpsc::unbounded_channel;

use youtube_downloader::logging;
use youtube_downloader::model::{DownloadEvent, DownloadRequest, FormatSelection};
use youtube_downloader::progress;
use youtube_downloader::update::download_with_retry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_stderr_logging();

    let url: String = Input::new().with_prompt("Enter YouTube URL").interact_text()?;
    let video: String = Input::new()
        .with_prompt("Download video? [0 = No, 1 = Yes]")
        .interact_text()?;
    let audio: String = Input::new()
        .with_prompt("Download audio? [0 = No, 1 = Yes]")
        .interact_text()?;

    let selection = match (video.trim(), audio.trim()) {
        ("1", "1") => FormatSelection::VideoAndAudio,
        ("1", "0") => FormatSelection::VideoOnly,
        ("0", "1") => FormatSelection::AudioOnly,
        _ => {
            println!("Both video and audio set to 0. Nothing to download.");
            return Ok(());
        }
    };

    let request = DownloadRequest {
        url: url.trim().to_string(),
        selection,
        output_dir: "downloads".into(),
    };

    // The download itself is sequential; a small side task prints the
    // progress events as they arrive.
    let (tx, mut rx) = unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                DownloadEvent::Progress {
                    downloaded_bytes,
                    total_bytes: Some(total),
                } => {
                    print!(
                        "\rDownloading: {:.1} MB of {:.1} MB ({:.1}%)   ",
                        progress::megabytes(downloaded_bytes),
                        progress::megabytes(total),
                        progress::percent(downloaded_bytes, total),
                    );
                    let _ = std::io::stdout().flush();
                }
                DownloadEvent::Progress {
                    downloaded_bytes,
                    total_bytes: None,
                } => {
                    print!(
                        "\rDownloaded: {:.1} MB   ",
                        progress::megabytes(downloaded_bytes)
                    );
                    let _ = std::io::stdout().flush();
                }
                DownloadEvent::Processing => println!("\nProcessing download..."),
                // Terminal results are reported below, off the return value
                DownloadEvent::Completed(_) | DownloadEvent::Failed(_) => {}
            }
        }
    });

    let result = download_with_retry(&request, &tx).await;
    drop(tx);
    let _ = printer.await;

    match result {
        Ok(path) => println!("\nDownload completed successfully: {}", path.display()),
        Err(e) => println!("\nSecond attempt failed. Quitting. ({e})"),
    }
    Ok(())
}
