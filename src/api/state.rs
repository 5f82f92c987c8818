//! Application state for the API server

use crate::config::Settings;
use crate::extractor::MediaExtractor;
use crate::pool::WorkerPool;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clones). The pool and extractor are
/// injected by the caller, so tests can substitute a stub extractor or a
/// single-worker pool.
#[derive(Clone)]
pub struct AppState {
    /// Immutable runtime settings
    pub settings: Arc<Settings>,

    /// Worker pool running blocking extraction jobs
    pub pool: Arc<WorkerPool>,

    /// Extraction capability invoked on the pool
    pub extractor: Arc<dyn MediaExtractor>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        settings: Arc<Settings>,
        pool: Arc<WorkerPool>,
        extractor: Arc<dyn MediaExtractor>,
    ) -> Self {
        Self {
            settings,
            pool,
            extractor,
        }
    }
}
