//! Media extraction and the audio download adapter
//!
//! The extraction capability itself (site scraping, format negotiation,
//! transcoding) is external. This module wraps it behind the
//! [`MediaExtractor`] trait and turns its raw metadata into a
//! [`DownloadResult`].
//!
//! - [`YtDlpExtractor`]: runs the `yt-dlp` binary
//! - [`download_audio`]: prepares the directory, runs an extractor, resolves
//!   search results and computes the final on-disk filename

mod cli;
mod traits;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use cli::YtDlpExtractor;
pub use traits::{ExtractOptions, MediaExtractor};

use crate::error::{Error, Result};
use crate::types::{DownloadResult, Metadata};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Download `target` as audio into `options.download_dir`
///
/// Blocking; call it from a worker thread. The download directory and its
/// parents are created when missing. The returned `output_file` always
/// carries the extension of `options.audio_format`, whatever the source's
/// native container was.
///
/// # Errors
///
/// Propagates extractor failures unchanged, and returns
/// [`Error::Retrieval`] when the metadata holds no usable entry.
pub fn download_audio(
    extractor: &dyn MediaExtractor,
    target: &str,
    options: &ExtractOptions,
) -> Result<DownloadResult> {
    std::fs::create_dir_all(&options.download_dir)?;

    let started = Instant::now();
    tracing::debug!(
        extractor = extractor.name(),
        source = target,
        format = %options.audio_format,
        "Starting extraction"
    );

    let info = extractor.extract(target, options)?;
    let entry = resolve_entry(info)?;

    let prepared = prepared_filename(&entry, options)?;
    let output_file = prepared.with_extension(options.audio_format.extension());

    tracing::info!(
        source = target,
        file = %output_file.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Extraction complete"
    );

    Ok(DownloadResult {
        source_url: target.to_string(),
        output_file,
        title: string_field(&entry, "title"),
        duration: entry.get("duration").and_then(Value::as_number).cloned(),
        extractor: string_field(&entry, "extractor_key"),
        webpage_url: string_field(&entry, "webpage_url"),
        info: entry,
    })
}

/// Pick the effective entry from an extractor document
///
/// Search directives come back playlist-shaped; only the first entry counts.
pub(crate) fn resolve_entry(info: Value) -> Result<Metadata> {
    let Value::Object(mut info) = info else {
        return Err(Error::Retrieval(
            "yt-dlp returned no info for the provided URL".into(),
        ));
    };

    let is_playlist = info.get("_type").and_then(Value::as_str) == Some("playlist");
    if !is_playlist {
        return Ok(info);
    }

    match info.remove("entries") {
        Some(Value::Array(entries)) => match entries.into_iter().next() {
            Some(Value::Object(first)) => Ok(first),
            Some(_) => Err(Error::Retrieval("first search result is empty".into())),
            None => Err(Error::Retrieval("no results found".into())),
        },
        _ => Err(Error::Retrieval("no results found".into())),
    }
}

/// Filename yt-dlp wrote before the transcode changed its extension
fn prepared_filename(entry: &Metadata, options: &ExtractOptions) -> Result<PathBuf> {
    let reported = string_field(entry, "_filename").or_else(|| string_field(entry, "filename"));

    let path = match reported {
        Some(name) => PathBuf::from(name),
        None => {
            let stem = string_field(entry, "title")
                .or_else(|| string_field(entry, "id"))
                .ok_or_else(|| Error::Retrieval("cannot determine output filename".into()))?;
            let ext = string_field(entry, "ext")
                .unwrap_or_else(|| options.audio_format.extension().to_string());
            PathBuf::from(format!("{}.{}", sanitize(&stem), ext))
        }
    };

    Ok(absolute_in(&options.download_dir, path))
}

fn absolute_in(dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        dir.join(path)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

fn string_field(entry: &Metadata, key: &str) -> Option<String> {
    entry.get(key).and_then(Value::as_str).map(String::from)
}
