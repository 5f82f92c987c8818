//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`system`]: Service descriptor and health
//! - [`downloads`]: Audio download trigger
//! - [`files`]: Authenticated file retrieval by absolute path

use serde::{Deserialize, Serialize};

mod downloads;
mod files;
mod system;

pub use downloads::*;
pub use files::*;
pub use system::*;

/// Query parameters for GET /file
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileQuery {
    /// Absolute path of a previously downloaded file
    pub path: String,
}
