//! Stub extractor for tests that must not touch the network or spawn yt-dlp.

use super::traits::{ExtractOptions, MediaExtractor};
use crate::types::AudioFormat;
use std::sync::Mutex;

/// Extractor returning a canned document and recording every call
pub(crate) struct StubExtractor {
    response: Result<serde_json::Value, String>,
    calls: Mutex<Vec<(String, AudioFormat)>>,
}

impl StubExtractor {
    /// Stub whose every call succeeds with `info`
    pub(crate) fn returning(info: serde_json::Value) -> Self {
        Self {
            response: Ok(info),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Stub whose every call fails with a retrieval error
    pub(crate) fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Targets passed to `extract`, in call order
    pub(crate) fn targets(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(target, _)| target.clone())
            .collect()
    }

    /// Audio formats passed to `extract`, in call order
    pub(crate) fn formats(&self) -> Vec<AudioFormat> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, format)| *format)
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl MediaExtractor for StubExtractor {
    fn extract(&self, target: &str, options: &ExtractOptions) -> crate::Result<serde_json::Value> {
        self.calls
            .lock()
            .unwrap()
            .push((target.to_string(), options.audio_format));

        self.response
            .clone()
            .map_err(crate::Error::Retrieval)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
