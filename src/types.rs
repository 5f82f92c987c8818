//! Core types for audio-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use utoipa::ToSchema;

/// yt-dlp prefix meaning "resolve this text as a search and keep only the first hit"
pub const SEARCH_PREFIX: &str = "ytsearch1:";

/// Opaque metadata mapping returned by the extraction capability
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Target audio codec for the transcoding step
///
/// Only codecs whose produced file extension equals the codec name are
/// accepted, so the on-disk extension always matches the requested format.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Advanced Audio Coding
    Aac,
    /// Free Lossless Audio Codec
    Flac,
    /// AAC in an MPEG-4 container
    M4a,
    /// MPEG-1 Layer III
    #[default]
    Mp3,
    /// Opus
    Opus,
    /// Uncompressed PCM
    Wav,
}

impl AudioFormat {
    /// All supported formats, in the order they are listed in error messages
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Aac,
        AudioFormat::Flac,
        AudioFormat::M4a,
        AudioFormat::Mp3,
        AudioFormat::Opus,
        AudioFormat::Wav,
    ];

    /// Lowercase codec identifier, also used as the file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::M4a => "m4a",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Opus => "opus",
            AudioFormat::Wav => "wav",
        }
    }

    /// File extension produced by the transcoder for this format
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        AudioFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| Error::Validation(format!("Unsupported audio format '{}'", s.trim())))
    }
}

/// Build the search directive for a free-text query
pub fn search_directive(query: &str) -> String {
    format!("{SEARCH_PREFIX}{query}")
}

/// Request body for POST /download
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DownloadRequest {
    /// Direct media URL
    #[serde(default)]
    pub url: Option<String>,
    /// Free-text search, used when no URL is given
    #[serde(default)]
    pub query: Option<String>,
    /// Audio format override (case-insensitive)
    #[serde(default)]
    pub audio_format: Option<String>,
}

impl DownloadRequest {
    /// Effective extraction target: the URL when present, else a search directive
    ///
    /// Empty strings count as absent.
    pub fn target(&self) -> Result<String> {
        match (non_empty(&self.url), non_empty(&self.query)) {
            (Some(url), _) => Ok(url.to_string()),
            (None, Some(query)) => Ok(search_directive(query)),
            (None, None) => Err(Error::Validation(
                "Provide either 'url' or 'query'".to_string(),
            )),
        }
    }

    /// Effective audio format: the override when present, else `default`
    pub fn effective_format(&self, default: AudioFormat) -> Result<AudioFormat> {
        match non_empty(&self.audio_format) {
            Some(raw) => raw.parse(),
            None => Ok(default),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Outcome of one extraction + transcode run
#[derive(Clone, Debug, Serialize)]
pub struct DownloadResult {
    /// The target handed to the extractor (URL or search directive)
    pub source_url: String,
    /// Absolute path of the transcoded file
    pub output_file: PathBuf,
    /// Media title, when the source provides one
    pub title: Option<String>,
    /// Duration in seconds, as the extractor reported it (integer or fractional)
    pub duration: Option<serde_json::Number>,
    /// Extractor identifier (e.g. "Youtube", "Generic")
    pub extractor: Option<String>,
    /// Canonical page URL of the resolved media
    pub webpage_url: Option<String>,
    /// Full metadata mapping, passed through unvalidated
    pub info: Metadata,
}

/// Response body for POST /download
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DownloadResponse {
    /// Media title
    pub title: Option<String>,
    /// Duration in seconds
    #[schema(value_type = Option<f64>)]
    pub duration: Option<serde_json::Number>,
    /// Canonical page URL, falling back to the requested target
    pub source_url: String,
    /// Extractor identifier
    pub extractor: Option<String>,
    /// Audio format actually used
    pub audio_format: AudioFormat,
    /// Absolute path of the file on the server
    pub file_path: String,
    /// Relative URL under the static `/files` mount
    pub file_url: Option<String>,
}

impl DownloadResponse {
    /// Map an extraction result onto the public response shape
    pub fn new(result: DownloadResult, audio_format: AudioFormat) -> Self {
        let file_url = file_url_for(&result.output_file);
        Self {
            title: result.title,
            duration: result.duration,
            source_url: result
                .webpage_url
                .filter(|url| !url.is_empty())
                .unwrap_or(result.source_url),
            extractor: result.extractor,
            audio_format,
            file_path: result.output_file.display().to_string(),
            file_url,
        }
    }
}

/// Public URL for a downloaded file, `None` if the path has no usable basename
pub fn file_url_for(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    Some(format!("/files/{name}"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: Option<&str>, query: Option<&str>, format: Option<&str>) -> DownloadRequest {
        DownloadRequest {
            url: url.map(String::from),
            query: query.map(String::from),
            audio_format: format.map(String::from),
        }
    }

    #[test]
    fn url_takes_precedence_over_query() {
        let req = request(Some("https://example.com/v"), Some("ignored"), None);
        assert_eq!(req.target().unwrap(), "https://example.com/v");
    }

    #[test]
    fn query_is_wrapped_in_search_directive() {
        let req = request(None, Some("lofi beats"), None);
        assert_eq!(req.target().unwrap(), "ytsearch1:lofi beats");
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let err = request(Some(""), Some(""), None).target().unwrap_err();
        assert_eq!(err.to_string(), "Provide either 'url' or 'query'");

        let req = request(Some(""), Some("song"), Some(""));
        assert_eq!(req.target().unwrap(), "ytsearch1:song");
        assert_eq!(req.effective_format(AudioFormat::Opus).unwrap(), AudioFormat::Opus);
    }

    #[test]
    fn format_override_is_case_insensitive() {
        let req = request(Some("u"), None, Some("FLAC"));
        assert_eq!(req.effective_format(AudioFormat::Mp3).unwrap(), AudioFormat::Flac);
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let err = "vorbis".parse::<AudioFormat>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "Unsupported audio format 'vorbis'");
    }

    #[test]
    fn audio_format_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AudioFormat::M4a).unwrap(), "m4a");
        assert_eq!(AudioFormat::default().extension(), "mp3");
    }

    #[test]
    fn response_prefers_webpage_url_and_derives_file_url() {
        let result = DownloadResult {
            source_url: "https://example.com/video".into(),
            output_file: PathBuf::from("/downloads/Song.mp3"),
            title: Some("Song".into()),
            duration: Some(180.into()),
            extractor: Some("Generic".into()),
            webpage_url: Some("https://example.com/canonical".into()),
            info: Metadata::new(),
        };

        let response = DownloadResponse::new(result, AudioFormat::Mp3);
        assert_eq!(response.source_url, "https://example.com/canonical");
        assert_eq!(response.file_path, "/downloads/Song.mp3");
        assert_eq!(response.file_url.as_deref(), Some("/files/Song.mp3"));
    }

    #[test]
    fn response_falls_back_to_original_target() {
        let result = DownloadResult {
            source_url: "ytsearch1:song".into(),
            output_file: PathBuf::from("/downloads/Song.mp3"),
            title: None,
            duration: None,
            extractor: None,
            webpage_url: None,
            info: Metadata::new(),
        };

        let response = DownloadResponse::new(result, AudioFormat::Mp3);
        assert_eq!(response.source_url, "ytsearch1:song");
        assert!(response.title.is_none());
    }

    #[test]
    fn empty_webpage_url_falls_back_to_original_target() {
        let result = DownloadResult {
            source_url: "https://example.com/video".into(),
            output_file: PathBuf::from("/downloads/Song.mp3"),
            title: Some("Song".into()),
            duration: None,
            extractor: None,
            webpage_url: Some(String::new()),
            info: Metadata::new(),
        };

        let response = DownloadResponse::new(result, AudioFormat::Mp3);
        assert_eq!(response.source_url, "https://example.com/video");
    }

    #[test]
    fn integer_duration_serializes_without_fraction() {
        let result = DownloadResult {
            source_url: "u".into(),
            output_file: PathBuf::from("/downloads/Song.mp3"),
            title: None,
            duration: Some(180.into()),
            extractor: None,
            webpage_url: None,
            info: Metadata::new(),
        };

        let json = serde_json::to_string(&DownloadResponse::new(result, AudioFormat::Mp3)).unwrap();
        assert!(json.contains(r#""duration":180,"#), "got {json}");
    }

    #[test]
    fn file_url_is_none_without_basename() {
        assert_eq!(file_url_for(Path::new("/")), None);
        assert_eq!(file_url_for(Path::new("/downloads/..")), None);
    }
}
