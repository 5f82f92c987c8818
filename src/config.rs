//! Runtime settings for audio-dl
//!
//! Settings are resolved once at startup from the process environment
//! (optionally seeded from a `.env` file) and never change afterwards.

use crate::error::{Error, Result};
use crate::types::AudioFormat;
use std::path::{Path, PathBuf};

const DEFAULT_API_KEY: &str = "change-me";
const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
const DEFAULT_AUDIO_FORMAT: &str = "mp3";
const DEFAULT_API_HOST: &str = "0.0.0.0";
const DEFAULT_API_PORT: &str = "8000";
const DEFAULT_WORKERS: &str = "4";
const DEFAULT_AUDIO_QUALITY: &str = "192";
const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Immutable runtime configuration
#[derive(Clone, Debug)]
pub struct Settings {
    /// Shared secret expected in the `X-API-Key` header (`API_KEY`)
    pub api_key: String,

    /// Absolute directory receiving transcoded files (`DOWNLOAD_DIR`)
    pub download_dir: PathBuf,

    /// Default audio format (`AUDIO_FORMAT`)
    pub audio_format: AudioFormat,

    /// Bind host (`API_HOST`)
    pub api_host: String,

    /// Bind port (`PORT`, then `API_PORT`)
    pub api_port: u16,

    /// Number of extraction worker threads (`DOWNLOAD_WORKERS`)
    pub workers: usize,

    /// Transcoder quality target in kbit/s (`AUDIO_QUALITY`)
    pub audio_quality: String,

    /// yt-dlp output template, relative to the download directory (`OUTPUT_TEMPLATE`)
    pub output_template: String,

    /// Explicit yt-dlp binary (`YTDLP_PATH`); searched in PATH when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Explicit ffmpeg location handed to yt-dlp (`FFMPEG_PATH`)
    pub ffmpeg_path: Option<PathBuf>,

    /// Log output format (`LOG_FORMAT`)
    pub log_format: LogFormat,

    /// `.env` file applied before reading the environment, if one was found
    pub env_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// A `.env` file in the working directory is applied first when present;
    /// variables already set in the environment win over it.
    ///
    /// The applied file is recorded in [`Settings::env_file`] for the caller
    /// to log once a subscriber is installed.
    pub fn from_env() -> Result<Self> {
        let env_file = dotenvy::dotenv().ok();
        let mut settings = Self::from_lookup(|key| std::env::var(key).ok())?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "API_KEY", Some(DEFAULT_API_KEY))?;

        let download_dir = lookup("DOWNLOAD_DIR").unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.into());
        let download_dir = resolve_dir(&download_dir)?;

        let audio_format = lookup("AUDIO_FORMAT").unwrap_or_else(|| DEFAULT_AUDIO_FORMAT.into());
        let audio_format = audio_format
            .parse::<AudioFormat>()
            .map_err(|e| Error::config("AUDIO_FORMAT", e.to_string()))?;

        let api_host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.into());

        let (port_key, port) = match lookup("PORT") {
            Some(port) => ("PORT", port),
            None => (
                "API_PORT",
                lookup("API_PORT").unwrap_or_else(|| DEFAULT_API_PORT.into()),
            ),
        };
        let api_port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::config(port_key, format!("invalid port '{port}': {e}")))?;

        let workers = lookup("DOWNLOAD_WORKERS").unwrap_or_else(|| DEFAULT_WORKERS.into());
        let workers = match workers.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(Error::config(
                    "DOWNLOAD_WORKERS",
                    format!("expected a positive integer, got '{workers}'"),
                ));
            }
        };

        let audio_quality = lookup("AUDIO_QUALITY").unwrap_or_else(|| DEFAULT_AUDIO_QUALITY.into());
        let output_template =
            lookup("OUTPUT_TEMPLATE").unwrap_or_else(|| DEFAULT_OUTPUT_TEMPLATE.into());

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::to_lowercase) {
            Some(f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            api_key,
            download_dir,
            audio_format,
            api_host,
            api_port,
            workers,
            audio_quality,
            output_template,
            ytdlp_path: lookup("YTDLP_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            ffmpeg_path: lookup("FFMPEG_PATH").filter(|p| !p.is_empty()).map(PathBuf::from),
            log_format,
            env_file: None,
        })
    }

    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn required<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .or_else(|| default.map(String::from))
        .ok_or_else(|| Error::config(key, format!("Missing required environment variable: {key}")))
}

/// Expand a leading `~` and make the path absolute; the directory need not exist
fn resolve_dir(raw: &str) -> Result<PathBuf> {
    let expanded = expand_home(raw);
    std::path::absolute(&expanded)
        .map_err(|e| Error::config("DOWNLOAD_DIR", format!("cannot resolve '{raw}': {e}")))
}

fn expand_home(raw: &str) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(Path::new(rest)),
        _ => PathBuf::from(raw),
    }
}
