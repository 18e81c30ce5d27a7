use super::*;
use crate::Config;
use crate::manager::test_helpers::{ScriptedProcessor, create_test_manager};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use std::time::Duration;
use tower::ServiceExt;


const BOUNDARY: &str = "----imgbatchTestBoundary7MA4YWxk";

/// Router over a manager backed by a scripted processor
fn create_test_app() -> (Router, SubmissionManager, Arc<ScriptedProcessor>) {
    create_test_app_with(Config::default())
}

fn create_test_app_with(config: Config) -> (Router, SubmissionManager, Arc<ScriptedProcessor>) {
    let processor = ScriptedProcessor::new();
    let manager = SubmissionManager::with_processor(config, processor.clone()).unwrap();
    let app = create_router(manager.clone(), manager.get_config());
    (app, manager, processor)
}

/// One part of a multipart upload: (field name, file name, content type, body)
type Part<'a> = (&'a str, &'a str, &'a str, &'a str);

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body = String::new();
    for (field, filename, content_type, contents) in parts {
        body.push_str(&format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\
             \r\n\
             {contents}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/items")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Response should be valid JSON")
}

#[tokio::test]
async fn cors_headers_present_when_enabled() {
    let (app, _manager, _processor) = create_test_app();

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn cors_headers_absent_when_disabled() {
    let mut config = Config::default();
    config.server.api.cors_enabled = false;
    let (app, _manager, _processor) = create_test_app_with(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn cors_with_specific_origin_only_allows_that_origin() {
    let mut config = Config::default();
    config.server.api.cors_origins = vec!["http://app.example".to_string()];
    let (app, _manager, _processor) = create_test_app_with(config);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://app.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://app.example"
    );
}

#[tokio::test]
async fn swagger_ui_can_be_disabled() {
    let (enabled, _m1, _p1) = create_test_app();
    let response = enabled.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut config = Config::default();
    config.server.api.swagger_ui = false;
    let (disabled, _m2, _p2) = create_test_app_with(config);
    let response = disabled.oneshot(get("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (app, _manager, _processor) = create_test_app();

    let response = app.oneshot(get("/downloads")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "not found: /downloads");
}

#[tokio::test]
async fn server_starts_and_responds_to_health() {
    let processor = ScriptedProcessor::new();
    let manager = create_test_manager(processor);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(manager.clone(), manager.get_config());
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server_handle.abort();
}

#[tokio::test]
async fn spawn_api_server_binds_configured_address() {
    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        probe.local_addr().unwrap().port()
    };
    let mut config = Config::default();
    config.server.api.bind_address = format!("127.0.0.1:{port}").parse().unwrap();
    let manager = SubmissionManager::with_processor(config, ScriptedProcessor::new()).unwrap();

    let api_handle = manager.spawn_api_server();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let response = reqwest::get(format!("http://127.0.0.1:{port}/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    api_handle.abort();
}
