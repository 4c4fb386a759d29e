//! End-to-end tests for the HTTP API: a real server on an ephemeral port,
//! driven by reqwest, with all state confined to temp directories.

use mdpress::{
    api::{router, AppState},
    ConversionService, HtmlPdfRenderer, JsonlArchiver, LocalFileStore, ServiceConfig,
};
use reqwest::multipart::{Form, Part};
use std::io::Read;
use std::sync::Arc;

/// Spin up the full application on 127.0.0.1:0. The returned TempDir owns
/// the input/output/archive directories and must stay alive for the test.
async fn spawn_app() -> (String, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = ServiceConfig::builder()
        .input_dir(tmp.path().join("input"))
        .output_dir(tmp.path().join("output"))
        .archive_dir(tmp.path().join("archive"))
        .build()
        .unwrap();

    let service = ConversionService::new(
        Arc::new(HtmlPdfRenderer::new()),
        Arc::new(LocalFileStore::new()),
    )
    .with_archiver(Arc::new(JsonlArchiver::new(config.archive_dir.clone())));

    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    (format!("http://{addr}"), tmp)
}

fn file_part(name: &str, content: &[u8]) -> Part {
    Part::bytes(content.to_vec()).file_name(name.to_string())
}

// ── Status endpoints ─────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_service_and_version() {
    let (base, _tmp) = spawn_app().await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    // Cross-cutting headers are present on every response.
    assert!(resp.headers().contains_key("x-request-id"));
    let process_time = resp.headers()["x-process-time"].to_str().unwrap();
    assert!(process_time.parse::<f64>().is_ok(), "got: {process_time}");

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "mdpress");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn root_reports_metadata() {
    let (base, _tmp) = spawn_app().await;

    let body: serde_json::Value = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "operational");
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn request_ids_are_fresh_per_request() {
    let (base, _tmp) = spawn_app().await;
    let client = reqwest::Client::new();

    let a = client.get(format!("{base}/health")).send().await.unwrap();
    let b = client.get(format!("{base}/health")).send().await.unwrap();
    assert_ne!(a.headers()["x-request-id"], b.headers()["x-request-id"]);
}

// ── Single-file conversion ───────────────────────────────────────────────────

#[tokio::test]
async fn markdown_upload_returns_a_pdf() {
    let (base, _tmp) = spawn_app().await;

    let form = Form::new().part("file", file_part("report.md", b"# Report\n\nBody text."));
    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/pdf");
    let disposition = resp.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.contains("report.pdf"), "got: {disposition}");

    let bytes = resp.bytes().await.unwrap();
    assert!(bytes.len() > 0);
    assert_eq!(&bytes[..4], b"%PDF");
}

#[tokio::test]
async fn exe_upload_is_rejected_as_unsupported() {
    let (base, _tmp) = spawn_app().await;

    let form = Form::new().part("file", file_part("malware.exe", b"MZ"));
    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Unsupported file type"), "got: {detail}");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let (base, _tmp) = spawn_app().await;

    let form = Form::new().part("file", file_part("empty.md", b""));
    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Uploaded file is empty");
}

#[tokio::test]
async fn oversize_upload_is_rejected_with_413() {
    let (base, _tmp) = spawn_app().await;

    let big = vec![b'a'; 10 * 1024 * 1024 + 1];
    let form = Form::new().part("file", file_part("big.txt", &big));
    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
}

// ── Bulk conversion ──────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_with_empty_input_dir_reports_no_files() {
    let (base, _tmp) = spawn_app().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/bulk-convert"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "No files found to process");
    assert_eq!(body["processed"], 0);
    assert_eq!(body["results"], serde_json::json!([]));
}

#[tokio::test]
async fn bulk_converts_the_input_directory() {
    let (base, tmp) = spawn_app().await;

    let input_dir = tmp.path().join("input");
    std::fs::create_dir_all(&input_dir).unwrap();
    std::fs::write(input_dir.join("one.md"), "# One").unwrap();
    std::fs::write(input_dir.join("two.txt"), "two").unwrap();

    let resp = reqwest::Client::new()
        .post(format!("{base}/bulk-convert"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Bulk conversion completed");
    assert_eq!(body["processed"], 2);
    assert_eq!(body["successful"], 2);
    assert_eq!(body["failed"], 0);

    let output_dir = tmp.path().join("output");
    assert!(output_dir.join("one.pdf").exists());
    assert!(output_dir.join("two.pdf").exists());
}

// ── Multi-file conversion ────────────────────────────────────────────────────

#[tokio::test]
async fn multi_upload_zips_valid_files_and_skips_invalid() {
    let (base, _tmp) = spawn_app().await;

    let form = Form::new()
        .part("files", file_part("a.md", b"# A"))
        .part("files", file_part("b.txt", b"b content"))
        .part("files", file_part("c.exe", b"MZ"));

    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/multiple"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/zip");
    assert_eq!(resp.headers()["x-conversion-results"], "2/3");

    let bytes = resp.bytes().await.unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.to_vec())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(archive.len(), 2);
    assert!(names.contains(&"a.pdf".to_string()), "got: {names:?}");
    assert!(names.contains(&"b.pdf".to_string()), "got: {names:?}");

    // Each entry is a real PDF.
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut head = [0u8; 4];
        entry.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"%PDF");
    }
}

#[test]
fn convert_uploads_records_skipped_entries_in_band() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ServiceConfig::builder()
        .archive_dir(tmp.path().join("archive"))
        .build()
        .unwrap();
    let service = ConversionService::new(
        Arc::new(HtmlPdfRenderer::new()),
        Arc::new(LocalFileStore::new()),
    );

    let uploads = vec![
        ("a.md".to_string(), b"# A".to_vec()),
        ("c.exe".to_string(), b"MZ".to_vec()),
        ("b.txt".to_string(), b"b".to_vec()),
    ];
    let output = mdpress::api::convert_uploads(&service, &config, &uploads).unwrap();

    assert_eq!(output.success_count, 2);
    let skipped: Vec<_> = output
        .results
        .iter()
        .filter(|r| r.status == "skipped")
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].file, "c.exe");
    assert!(skipped[0]
        .error
        .as_deref()
        .unwrap()
        .contains("Unsupported format: .exe"));
}

#[tokio::test]
async fn multi_upload_with_no_files_is_rejected() {
    let (base, _tmp) = spawn_app().await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/convert/multiple"))
        .multipart(Form::new().text("note", "no files here"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "No files provided.");
}
