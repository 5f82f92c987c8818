//! `audio-dl` server binary

use audio_dl::logging::init_tracing;
use audio_dl::{AppState, Settings, WorkerPool, YtDlpExtractor};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error starting server: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> audio_dl::Result<()> {
    let settings = Settings::from_env()?;
    init_tracing(settings.log_format);

    if let Some(path) = &settings.env_file {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    print_banner(&settings);

    let pool = WorkerPool::new(settings.workers)?;
    let extractor = YtDlpExtractor::discover(settings.ytdlp_path.clone())
        .with_ffmpeg_location(settings.ffmpeg_path.clone());

    if !extractor.ffmpeg_available() {
        tracing::warn!("ffmpeg not found; audio conversion will fail until it is installed");
    }

    tracing::info!(
        address = %settings.bind_address(),
        download_dir = %settings.download_dir.display(),
        audio_format = %settings.audio_format,
        workers = settings.workers,
        yt_dlp = %extractor.binary_path().display(),
        "Configuration loaded"
    );

    let state = AppState::new(Arc::new(settings), Arc::new(pool), Arc::new(extractor));
    audio_dl::api::start_api_server(state).await
}

fn print_banner(settings: &Settings) {
    let base = format!("http://{}", settings.bind_address());

    println!("🎵 Starting yt-dlp Audio API on {}", settings.bind_address());
    println!("📁 Download directory: {}", settings.download_dir.display());
    println!("🔑 API key: {}", settings.api_key);
    println!("🎧 Default audio format: {}", settings.audio_format);
    println!("👷 Download workers: {}", settings.workers);
    println!();
    println!("📖 Docs:     {base}/docs");
    println!("💓 Health:   {base}/health");
    println!("⬇️  Download: POST {base}/download");
    println!("📄 File:     GET {base}/file?path=<absolute path>");
    println!("🗂️  Files:    {base}/files/<name>");
    println!();
}
