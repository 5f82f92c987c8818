//! CLI-based extractor using the external yt-dlp binary

use super::traits::{ExtractOptions, MediaExtractor};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

const BINARY_NAME: &str = "yt-dlp";

/// Extractor that shells out to `yt-dlp`
///
/// yt-dlp performs site extraction and download, and drives `ffmpeg` for the
/// audio transcode. The resolved metadata is read back from its
/// `--dump-single-json` output once the download has finished.
///
/// # Examples
///
/// ```no_run
/// use audio_dl::extractor::{ExtractOptions, MediaExtractor, YtDlpExtractor};
/// use audio_dl::types::AudioFormat;
///
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
/// let options = ExtractOptions {
///     download_dir: "/tmp/audio".into(),
///     audio_format: AudioFormat::Mp3,
///     audio_quality: "192".into(),
///     output_template: "%(title)s.%(ext)s".into(),
/// };
/// let info = extractor.extract("ytsearch1:lofi beats", &options)?;
/// # Ok::<(), audio_dl::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct YtDlpExtractor {
    binary_path: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlpExtractor {
    /// Create an extractor with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            ffmpeg_location: None,
        }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path() -> Option<Self> {
        which::which(BINARY_NAME).ok().map(Self::new)
    }

    /// Resolve the binary from an explicit path, then PATH
    ///
    /// When neither yields a binary the bare name is kept, so a missing
    /// install only fails the requests that need it.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        Self::from_path().unwrap_or_else(|| {
            tracing::warn!("yt-dlp not found in PATH; downloads will fail until it is installed");
            Self::new(PathBuf::from(BINARY_NAME))
        })
    }

    /// Point yt-dlp at a specific ffmpeg binary or directory
    pub fn with_ffmpeg_location(mut self, location: Option<PathBuf>) -> Self {
        self.ffmpeg_location = location;
        self
    }

    /// Path of the yt-dlp binary this extractor runs
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary_path
    }

    /// Whether the transcoder is reachable (explicit location or `ffmpeg` in PATH)
    pub fn ffmpeg_available(&self) -> bool {
        match &self.ffmpeg_location {
            Some(location) => location.exists(),
            None => which::which("ffmpeg").is_ok(),
        }
    }

    pub(crate) fn build_args(&self, target: &str, options: &ExtractOptions) -> Vec<OsString> {
        let output = options.download_dir.join(&options.output_template);

        let mut args: Vec<OsString> = vec![
            "--format".into(),
            "bestaudio/best".into(),
            "--output".into(),
            output.into_os_string(),
            "--no-playlist".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            options.audio_format.as_str().into(),
            "--audio-quality".into(),
            format!("{}K", options.audio_quality).into(),
            "--quiet".into(),
            "--no-warnings".into(),
            "--no-progress".into(),
            "--no-ignore-errors".into(),
            "--dump-single-json".into(),
            "--no-simulate".into(),
        ];

        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(location.clone().into_os_string());
        }

        // Targets never get parsed as options
        args.push("--".into());
        args.push(target.into());
        args
    }
}

impl MediaExtractor for YtDlpExtractor {
    fn extract(&self, target: &str, options: &ExtractOptions) -> crate::Result<serde_json::Value> {
        let output = Command::new(&self.binary_path)
            .args(self.build_args(target, options))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .map(String::from)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", output.status));
            return Err(crate::Error::Retrieval(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() {
            return Err(crate::Error::Retrieval(
                "yt-dlp returned no info for the provided URL".into(),
            ));
        }

        serde_json::from_str(stdout)
            .map_err(|e| crate::Error::Retrieval(format!("unreadable yt-dlp metadata: {}", e)))
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
