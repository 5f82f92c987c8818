//! OpenAPI documentation and schema generation
//!
//! Generated at compile time with utoipa and served at `/openapi.json`,
//! with Swagger UI at `/docs`.

use utoipa::OpenApi;

/// OpenAPI documentation for the audio-dl REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "yt-dlp Audio API",
        version = "1.0.0",
        description = "Download audio from media URLs or search queries through yt-dlp",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    paths(
        crate::api::routes::root,
        crate::api::routes::health_check,
        crate::api::routes::start_download,
        crate::api::routes::get_file,
    ),
    components(schemas(
        crate::types::AudioFormat,
        crate::types::DownloadRequest,
        crate::types::DownloadResponse,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "system", description = "Service descriptor and health"),
        (name = "downloads", description = "Extract audio from a URL or the first search result"),
        (name = "files", description = "Retrieve downloaded files"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add API key authentication scheme to OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-API-Key"),
                    ),
                ),
            );
        }
    }
}
