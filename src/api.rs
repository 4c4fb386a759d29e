//! HTTP API: axum routes exposing the conversion service.
//!
//! Route paths are part of the public contract and must not change:
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /health` | liveness probe for monitors and load balancers |
//! | `GET /` | service metadata |
//! | `POST /convert/` | one uploaded file → PDF bytes |
//! | `POST /bulk-convert` | convert the configured local input directory |
//! | `POST /convert/multiple` | many uploaded files → ZIP of PDFs |
//!
//! Every response carries `X-Process-Time` (seconds, 4 decimals) and
//! `X-Request-ID` (fresh UUID v4), added by [`track_request`]. Error bodies
//! are `{"detail": "…"}` JSON.
//!
//! The conversion core is synchronous blocking I/O; handlers offload it with
//! `tokio::task::spawn_blocking` so the accept loop never stalls behind a
//! large document. Per-request scratch space is a [`tempfile::TempDir`]
//! whose RAII drop cleans up win or lose.

use crate::batch::{run_batch, FileOutcome};
use crate::config::ServiceConfig;
use crate::error::ConvertError;
use crate::ports::FileStore;
use crate::service::ConversionService;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::io::{Cursor, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

const ALLOWED_EXTENSIONS: &[&str] = &[".md", ".markdown", ".txt"];

/// Shared handler state: one service instance for the whole process.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConversionService>,
    pub config: Arc<ServiceConfig>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    // Multipart reads are bounded by the body limit; allow the full
    // multi-upload budget plus form-encoding overhead.
    let body_limit = (state.config.max_total_size_bytes as usize) + 1024 * 1024;

    Router::new()
        .route("/health", get(health))
        .route("/", get(root))
        .route("/convert/", post(convert_single))
        .route("/bulk-convert", post(bulk_convert))
        .route("/convert/multiple", post(convert_multiple))
        .layer(middleware::from_fn(track_request))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP API listening");
    axum::serve(listener, router(state)).await
}

// ── Middleware ───────────────────────────────────────────────────────────

/// Stamp every response with `X-Process-Time` and `X-Request-ID`, and log
/// request start/end with the same id.
async fn track_request(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!(%request_id, %method, %path, "request started");

    let mut response = next.run(req).await;

    let elapsed = format!("{:.4}", start.elapsed().as_secs_f64());
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&elapsed) {
        headers.insert("x-process-time", v);
    }
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", v);
    }

    info!(
        %request_id, %method, %path,
        status = %response.status(),
        elapsed_secs = %elapsed,
        "request completed"
    );
    response
}

// ── Error mapping ────────────────────────────────────────────────────────

/// A user-facing HTTP error with a `{"detail": …}` body.
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    fn payload_too_large(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            detail: detail.into(),
        }
    }

    fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ConvertError> for ApiError {
    fn from(e: ConvertError) -> Self {
        match e {
            ConvertError::UnsupportedFormat { .. } => ApiError::bad_request(e.to_string()),
            ConvertError::RenderFailed { .. } => {
                ApiError::internal(format!("PDF generation failed: {e}"))
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

// ── Status endpoints ─────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "mdpress",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Markdown & Text to PDF Converter",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "health": "/health",
    }))
}

// ── Upload validation helpers ────────────────────────────────────────────

/// Lower-cased extension with leading dot (`".md"`), empty when absent.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn is_allowed_extension(ext: &str) -> bool {
    ALLOWED_EXTENSIONS.contains(&ext)
}

/// Strip any directory components a client smuggled into the filename.
fn sanitized_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Drain the multipart stream into `(filename, bytes)` pairs, skipping
/// fields that are not file uploads.
async fn collect_uploads(mut multipart: Multipart) -> Result<Vec<(String, Vec<u8>)>, ApiError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(sanitized_name) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        uploads.push((filename, data.to_vec()));
    }
    Ok(uploads)
}

// ── Single-file conversion ───────────────────────────────────────────────

async fn convert_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut uploads = collect_uploads(multipart).await?;
    if uploads.is_empty() {
        return Err(ApiError::bad_request("No file provided."));
    }
    let (filename, content) = uploads.remove(0);

    let ext = extension_of(&filename);
    if !is_allowed_extension(&ext) {
        warn!(extension = %ext, "invalid file type attempted");
        return Err(ApiError::bad_request(format!(
            "Unsupported file type '{ext}'. Only .md, .markdown, and .txt are supported."
        )));
    }
    if content.is_empty() {
        warn!(file = %filename, "empty file uploaded");
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }
    if content.len() as u64 > state.config.max_file_size_bytes {
        warn!(bytes = content.len(), "file too large");
        return Err(ApiError::payload_too_large("File size exceeds 10MB limit"));
    }

    info!(file = %filename, bytes = content.len(), "converting uploaded file");

    let tmp = tempfile::tempdir()
        .map_err(|e| ApiError::internal(format!("Failed to allocate scratch space: {e}")))?;
    let input_path = tmp.path().join(&filename);
    let stem = Path::new(&filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.clone());
    let output_filename = format!("{stem}.pdf");
    let output_path = tmp.path().join(&output_filename);

    let service = Arc::clone(&state.service);
    let result_path = tokio::task::spawn_blocking(move || {
        service.store().save_file(&input_path, &content)?;
        service.convert_file(&input_path, &output_path)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Conversion task failed: {e}")))??;

    let pdf_bytes = std::fs::read(&result_path)
        .map_err(|e| ApiError::internal(format!("Failed to read generated PDF: {e}")))?;
    // `tmp` drops here — scratch files are removed win or lose.

    info!(file = %output_filename, bytes = pdf_bytes.len(), "conversion successful");

    let disposition = format!("attachment; filename=\"{output_filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        pdf_bytes,
    )
        .into_response())
}

// ── Bulk conversion of the local input directory ─────────────────────────

async fn bulk_convert(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("bulk conversion initiated via API");

    let input_dir = state.config.input_dir.clone();
    let output_dir = state.config.output_dir.clone();
    std::fs::create_dir_all(&input_dir)
        .map_err(|e| ApiError::internal(format!("Bulk conversion failed: {e}")))?;

    let service = Arc::clone(&state.service);
    let summary = tokio::task::spawn_blocking(move || {
        run_batch(&service, &input_dir, &output_dir, |_| {})
    })
    .await
    .map_err(|e| ApiError::internal(format!("Bulk conversion failed: {e}")))?
    .map_err(|e| ApiError::internal(format!("Bulk conversion failed: {e}")))?;

    Ok(Json(summary).into_response())
}

// ── Multi-file conversion → ZIP ──────────────────────────────────────────

/// Result of converting a set of uploads into an in-memory ZIP.
pub struct MultiConvertOutput {
    pub results: Vec<FileOutcome>,
    pub zip_bytes: Vec<u8>,
    pub success_count: usize,
}

/// Validate and convert uploads sequentially, packaging successes into a
/// ZIP archive. Invalid files become in-band `skipped` entries and failed
/// conversions become `error` entries; neither aborts the rest.
///
/// Synchronous by design — the handler runs it inside `spawn_blocking`.
pub fn convert_uploads(
    service: &ConversionService,
    config: &ServiceConfig,
    uploads: &[(String, Vec<u8>)],
) -> Result<MultiConvertOutput, ConvertError> {
    let tmp = tempfile::tempdir().map_err(|e| ConvertError::OutputWriteFailed {
        path: std::env::temp_dir(),
        source: e,
    })?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let zip_options =
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut results = Vec::with_capacity(uploads.len());
    let mut total_bytes: u64 = 0;

    for (filename, content) in uploads {
        let ext = extension_of(filename);
        if !is_allowed_extension(&ext) {
            results.push(FileOutcome::skipped(
                filename,
                format!("Unsupported format: {ext}"),
            ));
            continue;
        }
        if content.is_empty() {
            results.push(FileOutcome::skipped(filename, "File is empty"));
            continue;
        }

        total_bytes += content.len() as u64;
        if content.len() as u64 > config.max_file_size_bytes {
            results.push(FileOutcome::skipped(filename, "File exceeds 10MB limit"));
            continue;
        }
        if total_bytes > config.max_total_size_bytes {
            results.push(FileOutcome::skipped(
                filename,
                "Total request size exceeds 50MB limit",
            ));
            continue;
        }

        let input_path = tmp.path().join(filename);
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.clone());
        let output_filename = format!("{stem}.pdf");
        let output_path = tmp.path().join(&output_filename);

        let outcome = (|| -> Result<(), String> {
            service
                .store()
                .save_file(&input_path, content)
                .map_err(|e| e.to_string())?;
            let pdf_path = service
                .convert_file(&input_path, &output_path)
                .map_err(|e| e.to_string())?;
            let pdf_bytes = std::fs::read(&pdf_path).map_err(|e| e.to_string())?;
            zip.start_file(output_filename.as_str(), zip_options)
                .map_err(|e| e.to_string())?;
            zip.write_all(&pdf_bytes).map_err(|e| e.to_string())?;
            Ok(())
        })();

        match outcome {
            Ok(()) => results.push(FileOutcome::success(filename)),
            Err(e) => {
                warn!(file = %filename, error = %e, "multi-file item failed");
                results.push(FileOutcome::error(filename, e));
            }
        }
    }

    let cursor = zip.finish().map_err(|e| ConvertError::RenderFailed {
        detail: format!("ZIP packaging failed: {e}"),
    })?;
    let success_count = results.iter().filter(|r| r.status == "success").count();

    Ok(MultiConvertOutput {
        results,
        zip_bytes: cursor.into_inner(),
        success_count,
    })
}

async fn convert_multiple(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let uploads = collect_uploads(multipart).await?;

    if uploads.is_empty() {
        return Err(ApiError::bad_request("No files provided."));
    }
    if uploads.len() > state.config.max_files_per_request {
        return Err(ApiError::bad_request(format!(
            "Too many files. Maximum {} files allowed.",
            state.config.max_files_per_request
        )));
    }

    info!(count = uploads.len(), "multi-file conversion initiated");

    let service = Arc::clone(&state.service);
    let config = Arc::clone(&state.config);
    let output = tokio::task::spawn_blocking(move || {
        convert_uploads(&service, &config, &uploads)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Conversion task failed: {e}")))??;

    let total = output.results.len();
    info!(
        successful = output.success_count,
        total, "multi-file conversion completed"
    );

    let results_header = format!("{}/{}", output.success_count, total);
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static("attachment; filename=\"converted_pdfs.zip\""),
            ),
            (
                header::HeaderName::from_static("x-conversion-results"),
                HeaderValue::from_str(&results_header)
                    .unwrap_or_else(|_| HeaderValue::from_static("0/0")),
            ),
        ],
        output.zip_bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_extraction() {
        assert_eq!(extension_of("report.MD"), ".md");
        assert_eq!(extension_of("notes.markdown"), ".markdown");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("no_extension"), "");
    }

    #[test]
    fn allowed_extension_set() {
        for ext in [".md", ".markdown", ".txt"] {
            assert!(is_allowed_extension(ext), "{ext} should be allowed");
        }
        for ext in [".exe", ".pdf", ".html", ""] {
            assert!(!is_allowed_extension(ext), "{ext} should be rejected");
        }
    }

    #[test]
    fn sanitized_name_strips_directories() {
        assert_eq!(sanitized_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitized_name("dir/report.md"), "report.md");
        assert_eq!(sanitized_name("plain.txt"), "plain.txt");
    }
}
