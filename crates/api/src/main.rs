use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Instrument};
use uuid::Uuid;

mod config;
mod error;
mod logging;
mod metrics;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use ocr::{OcrProcessor, UploadError, UploadStore};
use requirements::{Pipeline, PipelineOutput, DEFAULT_MODEL_TYPE};

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

struct AppState {
    ocr: OcrProcessor,
    pipeline: Pipeline,
    uploads: UploadStore,
    metrics: Arc<Metrics>,
}

impl AppState {
    fn new(config: &AppConfig, ocr: OcrProcessor) -> Self {
        Self {
            ocr,
            pipeline: Pipeline::new(),
            uploads: UploadStore::new(
                &config.upload.dir,
                config.upload.allowed_extensions.clone(),
                config.upload.max_file_size,
            ),
            metrics: Metrics::new(),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    message: String,
}

#[derive(Serialize)]
struct UploadResponse {
    message: String,
    filename: String,
    filepath: String,
}

#[derive(Deserialize)]
struct ProcessRequest {
    filepath: Option<String>,
    model_type: Option<String>,
}

#[derive(Serialize)]
struct ProcessResponse {
    success: bool,
    #[serde(flatten)]
    output: PipelineOutput,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    // Compile extractor patterns before the first request
    extract::patterns::init();

    let ocr = OcrProcessor::from_mode(config.ocr.mode, &config.ocr.tesseract_cmd).await;
    info!(tesseract = ocr.is_tesseract_available(), "OCR ready");

    let state = Arc::new(AppState::new(&config, ocr));
    info!(dir = %state.uploads.dir().display(), "Uploads stored on disk");
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Use Case to FR Converter listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.uploads.max_file_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_check))
        .route("/upload", post(upload_file))
        .route("/process", post(process_diagram))
        .route("/stats", get(get_stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Use Case to FR Converter API is running".to_string(),
    })
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let result = store_upload(&state.uploads, multipart).await;
    state.metrics.record_request(result.is_ok());

    let path = result?;
    state.metrics.record_upload();

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        filename,
        filepath: path.to_string_lossy().into_owned(),
    }))
}

async fn store_upload(uploads: &UploadStore, mut multipart: Multipart) -> Result<PathBuf, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(uploads.store(&filename, &data).await?);
    }
    Err(UploadError::MissingFile.into())
}

async fn process_diagram(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("process", %request_id);

    async move {
        let path = match req.filepath.as_deref().map(Path::new) {
            Some(path) if path.exists() => path.to_path_buf(),
            _ => {
                state.metrics.record_request(false);
                return Err(ApiError::FileNotFound);
            }
        };
        let model_type = req.model_type.as_deref().unwrap_or(DEFAULT_MODEL_TYPE);

        let timer = TimedOperation::start();
        let output = state
            .pipeline
            .generate_requirements(&state.ocr, &path, model_type)
            .await;

        state
            .metrics
            .record_pipeline(&output.timings, timer.elapsed(), output.functional_requirements.len());
        state.metrics.record_request(true);

        Ok(Json(ProcessResponse {
            success: true,
            output,
        }))
    }
    .instrument(span)
    .await
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "reqgen-test-boundary";

    fn test_app(upload_dir: &Path) -> Router {
        let mut config = AppConfig::sample_mode();
        config.upload.dir = upload_dir.to_string_lossy().into_owned();
        router(Arc::new(AppState::new(&config, OcrProcessor::sample_only())))
    }

    fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, value: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_app(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn upload_stores_allowed_file() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(multipart_request("file", "use case.png", b"not really a png"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["filename"], "use_case.png");
        assert!(dir.path().join("use_case.png").exists());
        assert_eq!(
            body["filepath"],
            &*dir.path().join("use_case.png").to_string_lossy()
        );
    }

    #[tokio::test]
    async fn upload_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(multipart_request("file", "notes.txt", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid file type. Allowed: png, jpg, jpeg, pdf");
    }

    #[tokio::test]
    async fn upload_requires_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_app(dir.path())
            .oneshot(multipart_request("attachment", "scan.png", b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No file part");
    }

    #[tokio::test]
    async fn process_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let request = json_request(
            "/process",
            serde_json::json!({ "filepath": dir.path().join("absent.png") }),
        );
        let response = test_app(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "File not found");
    }

    #[tokio::test]
    async fn process_returns_full_pipeline_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let request = json_request("/process", serde_json::json!({ "filepath": path }));
        let response = test_app(dir.path()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert!(body["use_case_description"]["actors"].is_array());
        assert!(body["extracted_text"].as_str().unwrap().contains("Main Flow"));

        let requirements = body["functional_requirements"].as_array().unwrap();
        let matrix = body["traceability_matrix"].as_array().unwrap();
        assert!(!requirements.is_empty());
        assert_eq!(requirements.len(), matrix.len());
    }
}
