//! Parsing of yt-dlp output lines into progress data.

use std::path::PathBuf;

/// Template passed to yt-dlp so each progress update arrives as one
/// machine-readable stdout line:
/// `progress:<status>|<downloaded_bytes>|<total_bytes>|<total_bytes_estimate>`.
/// Unknown numeric fields are printed as `NA`.
pub const PROGRESS_TEMPLATE: &str = "progress:%(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s";

/// One parsed progress line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Raw transfer still running
    Downloading {
        downloaded_bytes: u64,
        /// `total_bytes`, falling back to yt-dlp's estimate
        total_bytes: Option<u64>,
    },
    /// Raw transfer finished; postprocessing may follow
    Finished,
}

/// Parses one stdout line produced by [`PROGRESS_TEMPLATE`].
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let rest = line.strip_prefix("progress:")?;
    let mut fields = rest.trim().split('|');
    let status = fields.next()?;
    let downloaded = fields.next().and_then(parse_bytes);
    let total = fields.next().and_then(parse_bytes);
    let estimate = fields.next().and_then(parse_bytes);

    match status {
        "finished" => Some(ProgressUpdate::Finished),
        "downloading" => Some(ProgressUpdate::Downloading {
            downloaded_bytes: downloaded?,
            total_bytes: total.or(estimate),
        }),
        _ => None,
    }
}

// yt-dlp prints `NA` for unknown fields and floats for estimated sizes
fn parse_bytes(field: &str) -> Option<u64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0)
        .map(|v| v as u64)
}

/// Extracts the output path from the destination lines yt-dlp prints:
/// `[download] Destination: ...`, `[ExtractAudio] Destination: ...`,
/// `[Merger] Merging formats into "..."` and the
/// `[download] ... has already been downloaded` shortcut.
pub fn parse_destination_line(line: &str) -> Option<PathBuf> {
    // covers the plain download and every postprocessor destination line
    if let Some(idx) = line.find("Destination: ") {
        return Some(PathBuf::from(line[idx + "Destination: ".len()..].trim()));
    }
    if let Some(rest) = line.strip_prefix("[Merger] Merging formats into ") {
        return Some(PathBuf::from(rest.trim().trim_matches('"')));
    }
    if let Some(rest) = line.strip_prefix("[download] ") {
        if let Some(path) = rest.strip_suffix(" has already been downloaded") {
            return Some(PathBuf::from(path.trim()));
        }
    }
    None
}

/// Percentage of `downloaded_bytes` over `total_bytes`, clamped to the
/// 0..=100 range; yt-dlp occasionally reports a few bytes past the total.
pub fn percent(downloaded_bytes: u64, total_bytes: u64) -> f32 {
    if total_bytes == 0 {
        return 0.0;
    }
    let pct = downloaded_bytes as f64 / total_bytes as f64 * 100.0;
    pct.clamp(0.0, 100.0) as f32
}

/// Byte count scaled to megabytes for status lines.
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_downloading_line_with_known_total() {
        assert_eq!(
            parse_progress_line("progress:downloading|1048576|2097152|NA"),
            Some(ProgressUpdate::Downloading {
                downloaded_bytes: 1048576,
                total_bytes: Some(2097152),
            })
        );
    }

    #[test]
    fn falls_back_to_the_estimated_total() {
        assert_eq!(
            parse_progress_line("progress:downloading|1048576|NA|2097152.0"),
            Some(ProgressUpdate::Downloading {
                downloaded_bytes: 1048576,
                total_bytes: Some(2097152),
            })
        );
    }

    #[test]
    fn reports_no_total_when_no_size_is_known() {
        assert_eq!(
            parse_progress_line("progress:downloading|1048576|NA|NA"),
            Some(ProgressUpdate::Downloading {
                downloaded_bytes: 1048576,
                total_bytes: None,
            })
        );
    }

    #[test]
    fn parses_finished_line() {
        assert_eq!(
            parse_progress_line("progress:finished|2097152|2097152|NA"),
            Some(ProgressUpdate::Finished)
        );
    }

    #[test]
    fn ignores_ordinary_output_lines() {
        assert_eq!(
            parse_progress_line("[youtube] dQw4w9WgXcQ: Downloading webpage"),
            None
        );
        assert_eq!(parse_progress_line(""), None);
    }

    #[test]
    fn percent_is_clamped_to_one_hundred() {
        assert_eq!(percent(105, 100), 100.0);
        assert_eq!(percent(50, 100), 50.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn megabytes_scales_binary_units() {
        assert_eq!(megabytes(1024 * 1024), 1.0);
        assert_eq!(megabytes(0), 0.0);
    }

    #[test]
    fn parses_download_destination() {
        assert_eq!(
            parse_destination_line("[download] Destination: yt_downloads/abc_1280x720.mp4"),
            Some(PathBuf::from("yt_downloads/abc_1280x720.mp4"))
        );
    }

    #[test]
    fn parses_extract_audio_destination() {
        assert_eq!(
            parse_destination_line("[ExtractAudio] Destination: yt_downloads/abc_audio.mp3"),
            Some(PathBuf::from("yt_downloads/abc_audio.mp3"))
        );
    }

    #[test]
    fn parses_quoted_merge_target() {
        assert_eq!(
            parse_destination_line(
                "[Merger] Merging formats into \"yt_downloads/abc_1280x720.mp4\""
            ),
            Some(PathBuf::from("yt_downloads/abc_1280x720.mp4"))
        );
    }

    #[test]
    fn parses_already_downloaded_shortcut() {
        assert_eq!(
            parse_destination_line("[download] yt_downloads/abc_720p.mp4 has already been downloaded"),
            Some(PathBuf::from("yt_downloads/abc_720p.mp4"))
        );
    }

    #[test]
    fn ignores_progress_percentage_lines() {
        assert_eq!(
            parse_destination_line("[download]  42.0% of 10.00MiB at 1.00MiB/s ETA 00:06"),
            None
        );
    }
}
