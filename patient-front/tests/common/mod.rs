#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use patient_front::config::{GatewaySettings, UpstreamSettings};
use patient_front::services::PatientClient;
use patient_front::startup::build_router;
use patient_front::AppState;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const TEST_AUTHORIZATION: &str = "Bearer tok1";

/// One request as the fake patient service saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<Vec<u8>>,
    pub request_id: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Upstream body is not JSON")
    }
}

#[derive(Clone)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    patients: Arc<Vec<Value>>,
    mutation_status: StatusCode,
}

/// Stand-in for the patient service. Records every request; serves a fixed
/// patient list and answers mutations with a configurable status.
pub struct FakeUpstream {
    pub address: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeUpstream {
    pub async fn spawn(patients: Vec<Value>, mutation_status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            requests: requests.clone(),
            patients: Arc::new(patients),
            mutation_status,
        };

        let app = Router::new().fallback(fake_handler).with_state(state);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake upstream");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            address: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn fake_handler(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .map(|v| v.as_bytes().to_vec()),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if method == Method::GET && path == "/patientBack/list" {
        return Json(json!(state.patients.as_ref())).into_response();
    }

    if method == Method::GET {
        if let Some(id) = path.strip_prefix("/patientBack/updateForm/") {
            return match state.patients.iter().find(|p| p["id"] == id) {
                Some(patient) => Json(patient.clone()).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            };
        }
    }

    state.mutation_status.into_response()
}

pub fn patient(id: &str, firstname: &str, name: &str) -> Value {
    json!({"id": id, "firstname": firstname, "name": name})
}

pub struct TestApp {
    pub router: Router,
    pub upstream: FakeUpstream,
}

impl TestApp {
    pub async fn spawn(patients: Vec<Value>) -> Self {
        Self::spawn_with(patients, StatusCode::OK, true).await
    }

    pub async fn spawn_with(
        patients: Vec<Value>,
        mutation_status: StatusCode,
        check_mutation_status: bool,
    ) -> Self {
        let upstream = FakeUpstream::spawn(patients, mutation_status).await;
        let client = PatientClient::new(
            &GatewaySettings {
                url: upstream.address.clone(),
            },
            &UpstreamSettings {
                timeout_secs: 5,
                check_mutation_status,
            },
        )
        .expect("Failed to build patient client");

        Self {
            router: build_router(AppState::new(Arc::new(client))),
            upstream,
        }
    }

    pub fn list_page_url(&self) -> String {
        format!("{}/patientFront/list", self.upstream.address)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, authorization: Option<&str>, form: &str) -> Response {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get("location")
        .expect("Missing Location header")
        .to_str()
        .expect("Invalid Location header")
}
