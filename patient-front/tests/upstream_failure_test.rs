mod common;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request, StatusCode},
};
use common::{location, TestApp, TEST_AUTHORIZATION};
use patient_front::config::{GatewaySettings, UpstreamSettings};
use patient_front::services::PatientClient;
use patient_front::startup::build_router;
use patient_front::AppState;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn rejected_mutation_surfaces_as_bad_gateway_when_checked() {
    let app = TestApp::spawn_with(vec![], StatusCode::INTERNAL_SERVER_ERROR, true).await;

    let response = app
        .post_form(
            "/patientFront/add",
            Some(TEST_AUTHORIZATION),
            "name=Doe&firstname=John",
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(app.upstream.requests().len(), 1);
}

#[tokio::test]
async fn mutation_of_absent_record_is_not_found_when_checked() {
    let app = TestApp::spawn_with(vec![], StatusCode::NOT_FOUND, true).await;

    let response = app
        .post_form(
            "/patientFront/update/42",
            Some(TEST_AUTHORIZATION),
            "name=Doe&firstname=John",
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.upstream.requests().len(), 1);
}

#[tokio::test]
async fn rejected_mutation_redirects_when_unchecked() {
    let app = TestApp::spawn_with(vec![], StatusCode::INTERNAL_SERVER_ERROR, false).await;

    let add = app
        .post_form(
            "/patientFront/add",
            Some(TEST_AUTHORIZATION),
            "name=Doe&firstname=John",
        )
        .await;
    let update = app
        .post_form(
            "/patientFront/update/7",
            Some(TEST_AUTHORIZATION),
            "name=Doe&firstname=John",
        )
        .await;
    let delete = app
        .get("/patientFront/delete/7", Some(TEST_AUTHORIZATION))
        .await;

    for response in [&add, &update, &delete] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(response), app.list_page_url());
    }

    // Exactly one outbound call per mutating request.
    let methods: Vec<Method> = app
        .upstream
        .requests()
        .into_iter()
        .map(|r| r.method)
        .collect();
    assert_eq!(methods, vec![Method::POST, Method::POST, Method::DELETE]);
}

#[tokio::test]
async fn failed_read_is_bad_gateway() {
    let app = TestApp::spawn_with(vec![], StatusCode::OK, true).await;

    // Nothing listens on this port: the transport failure must not be swallowed.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = PatientClient::new(
        &GatewaySettings {
            url: format!("http://127.0.0.1:{}", port),
        },
        &UpstreamSettings::default(),
    )
    .unwrap();
    let router = build_router(AppState::new(Arc::new(client)));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/patientFront/list")
                .header("authorization", TEST_AUTHORIZATION)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.upstream.requests().is_empty());
}

#[tokio::test]
async fn authorization_bytes_are_forwarded_unchanged() {
    let app = TestApp::spawn_with(vec![], StatusCode::NO_CONTENT, true).await;
    // Opaque token with doubled spaces and quoting must survive the hop untouched.
    let raw: &[u8] = b"Custom  tok=+/ ,x;\"q\"";

    let response = app
        .send(
            Request::builder()
                .method(Method::GET)
                .uri("/patientFront/delete/9")
                .header("authorization", HeaderValue::from_bytes(raw).unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let requests = app.upstream.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some(raw));
}

#[tokio::test]
async fn request_id_is_propagated_upstream() {
    let app = TestApp::spawn(vec![]).await;

    let response = app
        .send(
            Request::builder()
                .uri("/patientFront/list")
                .header("authorization", TEST_AUTHORIZATION)
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    assert_eq!(
        app.upstream.requests()[0].request_id.as_deref(),
        Some("req-123")
    );
}
