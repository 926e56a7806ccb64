//! `POST /analyze`
//!
//! Request lifecycle: received → validated → stored → processed → cleaned.
//! Validation happens before anything touches disk, and the stored document
//! is released on every path once it exists.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, info};

use crate::models::{AnalysisQuery, AnalysisResult, AppState};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_document))
        .with_state(state)
}

struct UploadedFile {
    filename: String,
    content: Bytes,
}

#[derive(Default)]
struct AnalyzeForm {
    file: Option<UploadedFile>,
    query: Option<String>,
}

async fn analyze_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<AnalysisResult>> {
    let form = read_form(multipart).await?;

    let upload = form
        .file
        .ok_or_else(|| AppError::InvalidRequest("No file uploaded.".to_string()))?;
    validate_filename(&upload.filename)?;
    if upload.content.is_empty() {
        return Err(AppError::EmptyFile);
    }

    let query = AnalysisQuery::from_form(form.query.as_deref());
    info!(
        filename = %upload.filename,
        size_bytes = upload.content.len(),
        defaulted_query = query.defaulted_when_empty,
        "Analysis request received"
    );

    let document = state.store.store(&upload.content, &upload.filename).await?;

    let outcome = state.orchestrator.run(&query, &document).await;

    state.store.release(document).await;

    match outcome {
        Ok(result) => {
            info!(
                filename = %result.file_processed,
                analysis_len = result.analysis.len(),
                "Analysis complete"
            );
            Ok(Json(result))
        }
        Err(e) => {
            error!(error = %e, "Analysis failed");
            Err(as_processing_error(e))
        }
    }
}

/// Failures past the validation stage are always reported as 500s
fn as_processing_error(err: AppError) -> AppError {
    if err.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
        err
    } else {
        AppError::Processing(err.to_string())
    }
}

fn validate_filename(filename: &str) -> AppResult<()> {
    if filename.to_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(AppError::UnsupportedMediaType(
            "Only PDF files are supported.".to_string(),
        ))
    }
}

async fn read_form(mut multipart: Multipart) -> AppResult<AnalyzeForm> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") if form.file.is_none() => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await.map_err(multipart_error)?;
                form.file = Some(UploadedFile { filename, content });
            }
            Some("query") if form.query.is_none() => {
                form.query = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file is too large.".to_string())
    } else {
        AppError::InvalidRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentRoster;
    use crate::config::Config;
    use crate::crew::Orchestrator;
    use crate::llm::{LLMAdapter, LLM};
    use crate::models::DEFAULT_QUERY;
    use crate::routes::create_router;
    use crate::storage::DocumentStore;
    use crate::tasks::TaskCatalog;
    use crate::tools::{SearchTool, Toolbox};
    use crate::types::{LLMRequest, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "----analyzer-test-boundary";

    /// Records the stored document path from each prompt and whether it
    /// existed at call time
    struct RecordingAdapter {
        fail: bool,
        seen: Mutex<Vec<(PathBuf, bool)>>,
    }

    impl RecordingAdapter {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                fail,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMAdapter for RecordingAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            let path = request.messages[1]
                .content
                .lines()
                .find_map(|l| l.strip_prefix("Uploaded document path: "))
                .map(PathBuf::from)
                .unwrap_or_default();
            let existed = path.exists();
            self.seen.lock().unwrap().push((path, existed));

            if self.fail {
                return Err(AppError::LLMApi("upstream timed out".to_string()));
            }
            Ok(LLMResponse {
                content: "{\"document_type\": \"Quarterly Update\"}".to_string(),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    fn test_app(work_dir: &Path, adapter: Arc<RecordingAdapter>) -> Router {
        let config = Config::for_tests(work_dir.to_path_buf());
        let roster = AgentRoster::standard().with_limits(
            config.agents.max_iterations,
            config.agents.max_requests_per_minute,
        );
        let orchestrator = Orchestrator::new(
            &roster,
            TaskCatalog::standard(),
            LLM::with_adapter(adapter, "mock", "mock-model"),
            Toolbox::new(SearchTool::disabled()),
        );
        let state = AppState {
            store: DocumentStore::new(config.storage.work_dir.clone()),
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        };
        create_router(state)
    }

    fn multipart_request(filename: &str, content: &[u8], query: Option<&str>) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
        if let Some(query) = query {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\n{query}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_files(dir: &Path) -> usize {
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    #[tokio::test]
    async fn test_root_message() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"message": "Financial Document Analyzer API is running"})
        );
    }

    #[tokio::test]
    async fn test_health_reports_capabilities() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["search_available"], false);
        assert_eq!(body["model"], "test-model");
    }

    #[tokio::test]
    async fn test_report_pdf_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let adapter = RecordingAdapter::new(false);
        let app = test_app(&work_dir, adapter.clone());

        let response = app
            .oneshot(multipart_request(
                "report.pdf",
                b"%PDF-1.4 ... minimal valid bytes",
                Some("Summarize this report"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["query"], "Summarize this report");
        assert_eq!(body["file_processed"], "report.pdf");
        assert!(!body["analysis"].as_str().unwrap().is_empty());

        // The file existed while the agent ran and is gone afterwards
        let seen = adapter.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1);
        assert!(seen[0].0.starts_with(&work_dir));
        assert!(!seen[0].0.exists());
        assert_eq!(stored_files(&work_dir), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_is_rejected_without_write() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let adapter = RecordingAdapter::new(false);

        for name in ["report.txt", "report.pdf.exe", "report", "pdf"] {
            let app = test_app(&work_dir, adapter.clone());
            let response = app
                .oneshot(multipart_request(name, b"%PDF-1.4 real pdf bytes", None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE, "{name}");
            assert_eq!(
                json_body(response).await["detail"],
                "Only PDF files are supported."
            );
        }

        assert!(!work_dir.exists());
        assert!(adapter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uppercase_extension_is_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let response = app
            .oneshot(multipart_request("ANNUAL.PDF", b"%PDF-1.4", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let app = test_app(&work_dir, RecordingAdapter::new(false));

        let response = app
            .oneshot(multipart_request("empty.pdf", b"", Some("anything")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "Empty file uploaded.");
        assert_eq!(stored_files(&work_dir), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let adapter = RecordingAdapter::new(false);
        let app = test_app(&work_dir, adapter.clone());

        let limit = Config::for_tests(work_dir.clone()).server.max_upload_bytes;
        let content = vec![b'x'; limit * 2];

        let response = app
            .oneshot(multipart_request("huge.pdf", &content, Some("anything")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json_body(response).await["detail"],
            "Uploaded file is too large."
        );
        assert_eq!(stored_files(&work_dir), 0);
        assert!(adapter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["detail"], "No file uploaded.");
    }

    #[tokio::test]
    async fn test_whitespace_query_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let response = app
            .oneshot(multipart_request("report.pdf", b"%PDF-1.4", Some("   \t ")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["query"], DEFAULT_QUERY);
    }

    #[tokio::test]
    async fn test_missing_query_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        let app = test_app(temp_dir.path(), RecordingAdapter::new(false));

        let response = app
            .oneshot(multipart_request("report.pdf", b"%PDF-1.4", None))
            .await
            .unwrap();

        assert_eq!(json_body(response).await["query"], DEFAULT_QUERY);
    }

    #[tokio::test]
    async fn test_llm_failure_returns_500_and_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let adapter = RecordingAdapter::new(true);
        let app = test_app(&work_dir, adapter.clone());

        let response = app
            .oneshot(multipart_request("report.pdf", b"%PDF-1.4", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Error processing document:"));
        assert!(detail.contains("upstream timed out"));

        // No retry with the default single iteration
        assert_eq!(adapter.seen.lock().unwrap().len(), 1);
        assert_eq!(stored_files(&work_dir), 0);
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let work_dir = temp_dir.path().join("data");
        let adapter = RecordingAdapter::new(false);
        let app = test_app(&work_dir, adapter.clone());

        let (a, b) = tokio::join!(
            app.clone()
                .oneshot(multipart_request("a.pdf", b"%PDF-1.4 first", Some("first"))),
            app.clone()
                .oneshot(multipart_request("b.pdf", b"%PDF-1.4 second", Some("second"))),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.status(), StatusCode::OK);
        assert_eq!(b.status(), StatusCode::OK);
        assert_eq!(json_body(a).await["file_processed"], "a.pdf");
        assert_eq!(json_body(b).await["file_processed"], "b.pdf");

        let seen = adapter.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0].0, seen[1].0);
        assert!(seen.iter().all(|(_, existed)| *existed));
        assert_eq!(stored_files(&work_dir), 0);
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("report.pdf").is_ok());
        assert!(validate_filename("Report.Pdf").is_ok());
        assert!(matches!(
            validate_filename("report.docx"),
            Err(AppError::UnsupportedMediaType(_))
        ));
        assert!(validate_filename("").is_err());
    }

    #[test]
    fn test_late_errors_become_processing_errors() {
        let err = as_processing_error(AppError::EmptyFile);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = as_processing_error(AppError::LLMApi("x".to_string()));
        assert!(matches!(err, AppError::LLMApi(_)));
    }
}
