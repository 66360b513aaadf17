//! Best-effort yt-dlp self-update and the CLI retry policy.

use std::future::Future;
use std::path::PathBuf;

use tokio::{process::Command, sync::mpsc::UnboundedSender};
use tracing::{info, warn};

use crate::downloader;
use crate::error::Result;
use crate::model::{DownloadEvent, DownloadRequest};

/// Upgrades the yt-dlp installation in place (`yt-dlp -U`). A failed
/// upgrade is logged and swallowed: the retry still goes ahead with
/// whatever version is installed.
pub async fn upgrade_ytdlp() {
    info!("Updating yt-dlp...");
    match Command::new("yt-dlp").arg("-U").status().await {
        Ok(status) if status.success() => info!("yt-dlp updated successfully."),
        Ok(status) => warn!("Failed to update yt-dlp: exited with {status}"),
        Err(e) => warn!("Failed to update yt-dlp: {e}"),
    }
}

/// Runs `attempt` up to twice, invoking `upgrade` exactly once between a
/// first failure and the retry. The first error is discarded in favor of
/// the retry's result; the upgrade step never runs more than once.
pub async fn retry_once_after_upgrade<T, A, AF, U, UF>(mut attempt: A, upgrade: U) -> Result<T>
where
    A: FnMut() -> AF,
    AF: Future<Output = Result<T>>,
    U: FnOnce() -> UF,
    UF: Future<Output = ()>,
{
    match attempt().await {
        Ok(value) => Ok(value),
        Err(first) => {
            warn!("Download failed (attempt 1): {first}");
            upgrade().await;
            attempt().await
        }
    }
}

/// CLI download policy: one attempt, one upgrade, one retry.
pub async fn download_with_retry(
    request: &DownloadRequest,
    events: &UnboundedSender<DownloadEvent>,
) -> Result<PathBuf> {
    retry_once_after_upgrade(|| downloader::run_download(request, events), upgrade_ytdlp).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadError;
    use std::cell::Cell;

    #[tokio::test]
    async fn success_on_the_first_attempt_skips_the_upgrade() {
        let attempts = Cell::new(0u32);
        let upgrades = Cell::new(0u32);
        let result: Result<PathBuf> = retry_once_after_upgrade(
            || {
                attempts.set(attempts.get() + 1);
                async { Ok(PathBuf::from("downloads/a.mp4")) }
            },
            || {
                upgrades.set(upgrades.get() + 1);
                async {}
            },
        )
        .await;
        assert_eq!(result.unwrap(), PathBuf::from("downloads/a.mp4"));
        assert_eq!(attempts.get(), 1);
        assert_eq!(upgrades.get(), 0);
    }

    #[tokio::test]
    async fn first_failure_upgrades_once_then_retries() {
        let attempts = Cell::new(0u32);
        let upgrades = Cell::new(0u32);
        let result: Result<PathBuf> = retry_once_after_upgrade(
            || {
                attempts.set(attempts.get() + 1);
                let n = attempts.get();
                async move {
                    if n == 1 {
                        Err(DownloadError::Download("HTTP 403".to_string()))
                    } else {
                        Ok(PathBuf::from("downloads/a.mp4"))
                    }
                }
            },
            || {
                upgrades.set(upgrades.get() + 1);
                async {}
            },
        )
        .await;
        assert_eq!(result.unwrap(), PathBuf::from("downloads/a.mp4"));
        assert_eq!(attempts.get(), 2);
        assert_eq!(upgrades.get(), 1);
    }

    #[tokio::test]
    async fn a_second_failure_gives_up_without_a_second_upgrade() {
        let attempts = Cell::new(0u32);
        let upgrades = Cell::new(0u32);
        let result: Result<PathBuf> = retry_once_after_upgrade(
            || {
                attempts.set(attempts.get() + 1);
                async { Err::<PathBuf, _>(DownloadError::Download("HTTP 404".to_string())) }
            },
            || {
                upgrades.set(upgrades.get() + 1);
                async {}
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.get(), 2);
        assert_eq!(upgrades.get(), 1);
    }
}
