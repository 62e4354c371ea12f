//! HTTP surface for docmeta.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Upload form.
//! - `POST /extract` – Multipart upload (`file` field); renders the metadata as an HTML page.
//! - `POST /api/extract` – Same upload, answered with JSON. Unsupported file types answer `422`
//!   with `{"Error": "Unsupported file type."}` as the `metadata` value.
//! - `GET /metrics` – Extraction counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools.
//! - `GET /health` – Liveness and the active entity recognizer.
//!
//! Both extract routes share the same processing service, so behavior is identical across them.

use crate::extraction::{DocumentFormat, TextSource};
use crate::metrics::MetricsSnapshot;
use crate::processing::{PipelineOutput, ProcessingApi, ProcessingError, UploadReport};
use crate::render;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::Instrument;
use uuid::Uuid;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the upload form and extraction API.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: ProcessingApi + 'static,
{
    Router::new()
        .route("/", get(upload_form))
        .route("/extract", post(extract_html::<S>))
        .route("/api/extract", post(extract_json::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .route("/health", get(get_health::<S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

async fn upload_form() -> Html<String> {
    Html(render::upload_page())
}

/// Pull the first `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or(AppError::MissingFile)?;
        let bytes = field.bytes().await?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(AppError::MissingFile)
}

async fn run_upload<S>(service: &S, multipart: Multipart) -> Result<UploadReport, AppError>
where
    S: ProcessingApi,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("extract", %request_id);
    async move {
        let (file_name, bytes) = read_upload(multipart).await?;
        let report = service.process_upload(file_name, bytes).await?;
        tracing::info!(
            file_name = %report.file_name,
            size_bytes = report.size_bytes,
            unsupported = report.processed.output.is_error(),
            used_ocr = report.processed.used_ocr(),
            "Extract request completed"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

/// Process an upload and render the result page.
async fn extract_html<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Html<String>, HtmlError>
where
    S: ProcessingApi,
{
    let report = run_upload(service.as_ref(), multipart).await?;
    Ok(Html(render::report_page(&report)))
}

/// Document facts reported next to the metadata.
#[derive(Serialize)]
struct DocumentInfo {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    bytes: u64,
    sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_source: Option<TextSource>,
}

/// Response body for `POST /api/extract`.
#[derive(Serialize)]
struct ExtractResponse {
    document: DocumentInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    processed_at: Option<String>,
    metadata: PipelineOutput,
}

/// Process an upload and answer with JSON.
async fn extract_json<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Response, AppError>
where
    S: ProcessingApi,
{
    let report = run_upload(service.as_ref(), multipart).await?;
    let status = if report.processed.output.is_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };

    let body = ExtractResponse {
        document: DocumentInfo {
            name: report.file_name,
            format: report.processed.format.map(DocumentFormat::extension),
            bytes: report.size_bytes,
            sha256: report.sha256,
            text_source: report.processed.text_source,
        },
        processed_at: OffsetDateTime::now_utc().format(&Rfc3339).ok(),
        metadata: report.processed.output,
    };
    Ok((status, Json(body)).into_response())
}

/// Return the extraction counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: ProcessingApi,
{
    Json(service.metrics_snapshot())
}

/// Liveness probe.
async fn get_health<S>(State(service): State<Arc<S>>) -> Json<serde_json::Value>
where
    S: ProcessingApi,
{
    Json(json!({
        "status": "ok",
        "recognizer": service.recognizer_name(),
    }))
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload_form",
                method: "GET",
                path: "/",
                description: "HTML form for uploading a PDF, DOCX, or TXT file.",
                request_example: None,
            },
            CommandDescriptor {
                name: "extract",
                method: "POST",
                path: "/extract",
                description: "Multipart upload (field `file`). Extracts title, summary, keywords, and named entities and renders them as HTML.",
                request_example: None,
            },
            CommandDescriptor {
                name: "extract_json",
                method: "POST",
                path: "/api/extract",
                description: "Multipart upload (field `file`). Returns { \"document\": {...}, \"processed_at\": string, \"metadata\": { \"Title\", \"Summary\", \"Keywords\", \"Named Entities\" } }; unsupported types return 422 with { \"Error\": string } as metadata.",
                request_example: Some(json!({
                    "file": "@report.pdf"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return extraction counters (processed, rejected, failed, OCR fallbacks).",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Liveness probe reporting the active entity recognizer.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    MissingFile,
    Multipart(MultipartError),
    Processing(ProcessingError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Multipart(error) => error.status(),
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingFile => format!("Missing `{FILE_FIELD}` upload field."),
            Self::Multipart(error) => error.body_text(),
            Self::Processing(error) => {
                // Details go to the log; clients get a stable message.
                tracing::error!(error = %error, "Failed to process document");
                "Failed to process document.".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart(inner)
    }
}

/// [`AppError`] rendered as an HTML page for the form route.
struct HtmlError(AppError);

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        (status, Html(render::failure_page(&self.0.message()))).into_response()
    }
}

impl From<AppError> for HtmlError {
    fn from(inner: AppError) -> Self {
        Self(inner)
    }
}
