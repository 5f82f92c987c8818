//! Trait and options for the media extraction capability

use crate::types::AudioFormat;
use std::path::PathBuf;

/// Fixed per-invocation options handed to the extractor
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Directory receiving the output file (created by the adapter beforehand)
    pub download_dir: PathBuf,
    /// Codec the raw stream is transcoded into
    pub audio_format: AudioFormat,
    /// Transcoder quality target in kbit/s
    pub audio_quality: String,
    /// Filename template, relative to `download_dir`
    pub output_template: String,
}

/// A blocking "given a URL, retrieve media and metadata" capability
///
/// Implementations download and transcode in one call and return the raw
/// metadata document. The document may be playlist-shaped when the target
/// was a search directive; resolving that is the caller's job.
///
/// Calls block for as long as the fetch and transcode take, so they must
/// run on the worker pool, never on the async runtime.
pub trait MediaExtractor: Send + Sync {
    /// Download `target` according to `options` and return its metadata
    ///
    /// # Errors
    ///
    /// - [`crate::Error::ExternalTool`] if the extractor cannot be executed
    /// - [`crate::Error::Retrieval`] if it ran but produced no usable result
    fn extract(&self, target: &str, options: &ExtractOptions) -> crate::Result<serde_json::Value>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
