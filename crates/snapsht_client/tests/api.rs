use pretty_assertions::assert_eq;
use serde_json::json;
use snapsht_client::{
    CaptureApi, ClientSettings, FailureKind, ReqwestCaptureClient,
};
use snapsht_core::{
    BatchState, CaptureKind, ImageFormat, ScreenshotOptions, ScreenshotRequest, VideoForm,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestCaptureClient {
    ReqwestCaptureClient::new(ClientSettings::with_base_url(server.uri())).expect("client")
}

fn screenshot_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "filename": format!("{id}.png"),
        "size": 4096,
        "format": "png",
        "dimensions": {"width": 1280, "height": 720},
        "full_page": false,
        "download_url": format!("/api/screenshot/{id}"),
        "created_at": "2024-05-01T12:00:00.5"
    })
}

fn status_body(status: &str) -> serde_json::Value {
    json!({
        "batch_id": "b-1",
        "total_jobs": 2,
        "completed": 1,
        "failed": 0,
        "processing": 1,
        "pending": 0,
        "status": status,
        "progress": 50.0,
        "jobs": []
    })
}

#[tokio::test]
async fn screenshot_posts_json_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/screenshot"))
        .and(body_json(json!({
            "url": "https://example.com",
            "width": 1280,
            "format": "png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(screenshot_body("s1")))
        .expect(1)
        .mount(&server)
        .await;

    let request = ScreenshotRequest {
        url: "https://example.com".to_string(),
        options: ScreenshotOptions {
            width: Some(1280),
            format: Some(ImageFormat::Png),
            ..ScreenshotOptions::default()
        },
    };
    let result = client_for(&server)
        .capture_screenshot(&request)
        .await
        .expect("screenshot ok");

    assert_eq!(result.capture.id, "s1");
    assert_eq!(result.capture.size, 4096);
    assert_eq!(result.capture.download_url, "/api/screenshot/s1");
}

#[tokio::test]
async fn server_detail_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/screenshot"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"detail": "rate limited"})))
        .mount(&server)
        .await;

    let request = ScreenshotRequest {
        url: "https://example.com".to_string(),
        options: ScreenshotOptions::default(),
    };
    let err = client_for(&server)
        .capture_screenshot(&request)
        .await
        .unwrap_err();

    assert_eq!(err.message, "rate limited");
    assert_eq!(err.kind, FailureKind::HttpStatus(429));
    assert_eq!(err.to_string(), "rate limited");
}

#[tokio::test]
async fn unparsable_error_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/video"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .capture_video(&VideoForm::default().to_request())
        .await
        .unwrap_err();

    assert_eq!(err.message, "Video capture failed");
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
}

#[tokio::test]
async fn malformed_success_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_batch(&["https://a.com".to_string()], None)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
    assert_eq!(err.message, "Batch creation failed");
}

#[tokio::test]
async fn create_batch_sends_urls_and_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/batch"))
        .and(body_json(json!({
            "urls": ["https://a.com", "https://b.com"],
            "options": {"full_page": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "batch_id": "b-1",
            "total_jobs": 2,
            "status_url": "/api/batch/b-1",
            "message": "Batch submitted. 2 jobs queued for processing."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = ScreenshotOptions {
        full_page: Some(true),
        ..ScreenshotOptions::default()
    };
    let ticket = client_for(&server)
        .create_batch(
            &["https://a.com".to_string(), "https://b.com".to_string()],
            Some(&options),
        )
        .await
        .expect("batch ok");

    assert_eq!(ticket.batch_id, "b-1");
    assert_eq!(ticket.total_jobs, 2);
    assert_eq!(ticket.status_url, "/api/batch/b-1");
}

#[tokio::test]
async fn batch_status_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/batch/b-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "batch": status_body("processing")})),
        )
        .mount(&server)
        .await;

    let status = client_for(&server)
        .batch_status("b-1")
        .await
        .expect("status ok");

    assert_eq!(status.status, BatchState::Processing);
    assert!(status.counts_consistent());
}

#[tokio::test]
async fn missing_batch_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/batch/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Batch not found"})))
        .mount(&server)
        .await;

    let err = client_for(&server).batch_status("nope").await.unwrap_err();
    assert_eq!(err.message, "Batch not found");
}

#[tokio::test]
async fn transport_failure_uses_fallback() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client = ReqwestCaptureClient::new(ClientSettings::with_base_url(uri)).expect("client");

    let err = client.batch_status("b-1").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
    assert_eq!(err.message, "Failed to get batch status");
}

#[tokio::test]
async fn health_and_readiness_are_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T12:00:00",
            "uptime": 12.5,
            "browser": {"initialized": true, "available_drivers": 2}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health/ready"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ready": false,
            "reason": "Browser pool not ready"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let health = client.health().await.expect("health");
    assert_eq!(health.status, "healthy");
    assert_eq!(health.browser["available_drivers"], json!(2));

    let ready = client.readiness().await.expect("ready");
    assert!(!ready.ready);
    assert_eq!(ready.reason.as_deref(), Some("Browser pool not ready"));
}

#[tokio::test]
async fn delete_hits_kind_specific_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/video/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/screenshot/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Screenshot not found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .delete_capture(CaptureKind::Video, "v1")
        .await
        .expect("delete ok");
    let err = client
        .delete_capture(CaptureKind::Screenshot, "missing")
        .await
        .unwrap_err();
    assert_eq!(err.message, "Screenshot not found");
}

#[tokio::test]
async fn download_returns_bytes_and_enforces_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/screenshot/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 32]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client.download("/api/screenshot/s1").await.expect("download");
    assert_eq!(bytes.len(), 32);

    let settings = ClientSettings {
        max_download_bytes: 16,
        ..ClientSettings::with_base_url(server.uri())
    };
    let small = ReqwestCaptureClient::new(settings).expect("client");
    let err = small.download("/api/screenshot/s1").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 16,
            actual: Some(32)
        }
    );
}
