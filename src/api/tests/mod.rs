use super::*;
use crate::config::Settings;
use crate::extractor::test_helpers::StubExtractor;
use crate::pool::WorkerPool;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use serde_json::{Value, json};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;


const TEST_API_KEY: &str = "test-key";

/// Router wired to a stub extractor and a temporary download directory
struct TestApp {
    router: Router,
    extractor: Arc<StubExtractor>,
    temp_dir: TempDir,
}

impl TestApp {
    fn new(info: Value) -> Self {
        Self::with_extractor(|_| StubExtractor::returning(info))
    }

    /// Stub metadata for a single video whose native container is webm
    fn with_song(title: &str) -> Self {
        Self::with_extractor(|dir| {
            StubExtractor::returning(json!({
                "title": title,
                "ext": "webm",
                "duration": 180,
                "extractor_key": "Generic",
                "webpage_url": "https://example.com/v",
                "_filename": dir.join(format!("{title}.webm")),
            }))
        })
    }

    fn with_extractor(build: impl FnOnce(&Path) -> StubExtractor) -> Self {
        let temp_dir = tempfile::tempdir().unwrap();
        let download_dir = temp_dir.path().to_string_lossy().to_string();

        let settings = Settings::from_lookup(|key| match key {
            "API_KEY" => Some(TEST_API_KEY.to_string()),
            "DOWNLOAD_DIR" => Some(download_dir.clone()),
            _ => None,
        })
        .unwrap();

        let extractor = Arc::new(build(&settings.download_dir));
        let state = AppState::new(
            Arc::new(settings),
            Arc::new(WorkerPool::new(2).unwrap()),
            extractor.clone(),
        );

        Self {
            router: create_router(state),
            extractor,
            temp_dir,
        }
    }

    fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn download_request(body: Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/download")
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_server_serves_until_shutdown() {
    let temp_dir = tempfile::tempdir().unwrap();
    let download_dir = temp_dir.path().to_string_lossy().to_string();
    let settings = Settings::from_lookup(|key| match key {
        "DOWNLOAD_DIR" => Some(download_dir.clone()),
        _ => None,
    })
    .unwrap();
    let state = AppState::new(
        Arc::new(settings),
        Arc::new(WorkerPool::new(1).unwrap()),
        Arc::new(StubExtractor::returning(json!({}))),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let raw = tokio::time::timeout(Duration::from_secs(5), async {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let mut stream = tokio::net::TcpStream::connect(address).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).to_string()
    })
    .await
    .unwrap();

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    assert!(raw.contains("\"status\":\"ok\""));

    stop_tx.send(()).unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::new(json!({}));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "https://somewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_preflight_on_protected_route() {
    let app = TestApp::new(json!({}));

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/download")
        .header("Origin", "https://somewhere.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "x-api-key,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-methods"));
    assert_eq!(app.extractor.call_count(), 0);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = TestApp::new(json!({}));

    let response = app.send(get("/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    for path in ["/", "/health", "/download", "/file"] {
        assert!(doc["paths"].get(path).is_some(), "missing path {path}");
    }
}
