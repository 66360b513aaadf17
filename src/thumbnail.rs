//! Downloading and decoding video preview thumbnails from YouTube.

use eframe::egui::ColorImage;

/// Fetches the standard high-quality thumbnail for a video id, decoded
/// into an egui-ready image. Returns None on any network or decode error;
/// the preview is cosmetic and never blocks a download.
pub fn fetch_thumbnail(video_id: &str) -> Option<ColorImage> {
    let url = format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id);
    // Blocking HTTP GET; callers run this on a blocking worker
    let resp = reqwest::blocking::get(&url).ok()?.bytes().ok()?;
    let img = image::load_from_memory(&resp).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, &img))
}

/// Extracts the `v` parameter from a watch URL, or the path tail of a
/// youtu.be short link.
pub fn video_id_from_url(url: &str) -> Option<String> {
    if let Some(rest) = url.split("v=").nth(1) {
        return rest
            .split('&')
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
    }
    if let Some(rest) = url.split("youtu.be/").nth(1) {
        return rest
            .split(['?', '&'])
            .next()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_watch_parameter() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_the_short_link_tail() {
        assert_eq!(
            video_id_from_url("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn rejects_urls_without_a_video_id() {
        assert_eq!(video_id_from_url("https://example.com/video"), None);
        assert_eq!(video_id_from_url("https://youtu.be/"), None);
    }
}
