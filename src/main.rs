//! Main application for the YouTube Downloader GUI

use youtube_downloader::downloader::spawn_download;
use youtube_downloader::logging;
use youtube_downloader::model::{
    DownloadEvent, DownloadOutcome, DownloadRequest, DownloadSession, FormatSelection, StartError,
};
use youtube_downloader::thumbnail;

// eframe/egui for GUI application framework
use eframe::{App, Frame, egui};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for folder selection dialogs
use rfd::FileDialog;
use std::sync::{Arc, Mutex};
use tokio::{
    runtime::Runtime,
    sync::mpsc::{UnboundedReceiver, unbounded_channel},
};
use egui::{Color32, ColorImage, RichText, TextureOptions, Visuals};
use tracing::info;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging and the runtime, launches GUI
fn main() -> Result<(), eframe::Error> {
    // Timestamped info/error lines appended to download.log
    logging::init_file_logging();

    // Create a new Tokio runtime and store it globally
    let rt = Arc::new(Runtime::new().unwrap());
    RUNTIME.set(rt).unwrap();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "YouTube Video Downloader",
        options,
        Box::new(|cc| {
            // Use dark theme visuals
            let visuals = Visuals::dark();
            cc.egui_ctx.set_visuals(visuals);
            Box::new(DownloaderApp::default())
        }),
    )
}

/// Application state for the GUI
struct DownloaderApp {
    /// Input field for the video URL
    url_input: String,
    /// Destination folder for downloads
    download_folder: String,
    /// Selected stream option
    selection: FormatSelection,
    /// The single active download session
    session: DownloadSession,
    /// Notice shown below the status line once a download ends
    notice: Option<(String, Color32)>,
    /// Receiver for the active worker's events
    events_rx: Option<UnboundedReceiver<DownloadEvent>>,
    /// Cached texture for the current video's thumbnail
    thumbnail: Option<egui::TextureHandle>,
    /// Incoming thumbnail fetch results (video_id, image)
    thumbnail_results: Arc<Mutex<Vec<(String, ColorImage)>>>,
}

/// Default initial state for DownloaderApp
impl Default for DownloaderApp {
    fn default() -> Self {
        Self {
            url_input: String::new(),
            download_folder: "yt_downloads".to_string(),
            selection: FormatSelection::VideoAndAudio,
            session: DownloadSession::default(),
            notice: None,
            events_rx: None,
            thumbnail: None,
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DownloaderApp {
    /// Trigger action: validates the request against the session guard,
    /// then hands it to a fresh worker on the global runtime.
    fn start_download(&mut self) {
        let url = self.url_input.trim().to_string();
        if let Err(reason) = self.session.try_start(&url, self.selection) {
            self.notice = Some(match reason {
                StartError::EmptyUrl => (
                    "Please enter a YouTube URL".to_string(),
                    Color32::YELLOW,
                ),
                StartError::AlreadyDownloading => (
                    "A download is already in progress".to_string(),
                    Color32::LIGHT_BLUE,
                ),
            });
            return;
        }
        self.notice = None;

        let request = DownloadRequest {
            url: url.clone(),
            selection: self.selection,
            output_dir: self.download_folder.clone().into(),
        };
        info!(
            "Starting download: {} ({})",
            request.url,
            request.selection.label()
        );

        // Fetch the thumbnail on a blocking worker
        self.thumbnail = None;
        if let Some(video_id) = thumbnail::video_id_from_url(&url) {
            let results = Arc::clone(&self.thumbnail_results);
            RUNTIME.get().unwrap().spawn_blocking(move || {
                if let Some(img) = thumbnail::fetch_thumbnail(&video_id) {
                    results.lock().unwrap().push((video_id, img));
                }
            });
        }

        // Create the event channel and launch the download worker
        let (tx, rx) = unbounded_channel();
        self.events_rx = Some(rx);
        RUNTIME.get().unwrap().spawn(spawn_download(request, tx));
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Drain worker events in emission order before drawing
        if let Some(rx) = self.events_rx.as_mut() {
            while let Ok(event) = rx.try_recv() {
                self.session.apply(event);
            }
        }

        // Handle a finished session: show the notice, clear the URL field
        if let Some(outcome) = self.session.take_outcome() {
            match outcome {
                DownloadOutcome::Completed(path) => {
                    self.notice = Some((
                        format!("Downloaded successfully to:\n{}", path.display()),
                        Color32::GREEN,
                    ));
                    self.url_input.clear();
                }
                DownloadOutcome::Failed(message) => {
                    self.notice = Some((message, Color32::RED));
                }
            }
            self.events_rx = None;
        }

        // Handle completed thumbnail fetches
        {
            let mut pending = self.thumbnail_results.lock().unwrap();
            for (vid, img) in pending.drain(..) {
                // Load image into an egui texture and cache it
                let tex = ctx.load_texture(&vid, img, TextureOptions::default());
                self.thumbnail = Some(tex);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("YouTube Video Downloader");

            // URL input field; Enter triggers the download
            ui.label("Enter the YouTube URL:  [press Enter/Return to download]");
            let response = ui.text_edit_singleline(&mut self.url_input);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            // Folder selection
            ui.horizontal(|ui| {
                ui.label("Download folder:");
                ui.text_edit_singleline(&mut self.download_folder);
                if ui.button("Browse…").clicked() {
                    if let Some(folder) = FileDialog::new()
                        .set_directory(&self.download_folder)
                        .pick_folder()
                    {
                        self.download_folder = folder.display().to_string();
                    }
                }
            });

            // Download options radio group
            ui.label("Download Options:");
            ui.radio_value(
                &mut self.selection,
                FormatSelection::VideoAndAudio,
                "Video & Audio",
            );
            ui.radio_value(&mut self.selection, FormatSelection::VideoOnly, "Video Only");
            ui.radio_value(&mut self.selection, FormatSelection::AudioOnly, "Audio Only");

            // Thumbnail of the current video, once fetched
            if let Some(tex) = &self.thumbnail {
                ui.image(tex);
            }

            // Progress bar with percentage, plus the live status line
            ui.label("Download Progress:");
            ui.add(egui::ProgressBar::new(self.session.percent / 100.0).show_percentage());
            ui.label(&self.session.status_line);

            // Completion/failure/validation notice
            if let Some((text, color)) = &self.notice {
                ui.label(RichText::new(text).color(*color));
            }

            ui.horizontal(|ui| {
                // Download button is disabled while a session is in flight
                let clicked = ui
                    .add_enabled(!self.session.in_flight(), egui::Button::new("Download"))
                    .clicked();
                if clicked || submitted {
                    self.start_download();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });

        // Request periodic repaint so worker events keep flowing in
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
