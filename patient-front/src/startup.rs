use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    add_patient, add_patient_form, delete_patient, health_check, list_patients, metrics,
    update_patient, update_patient_form,
};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    let patient_routes = Router::new()
        .route("/list", get(list_patients))
        .route("/updateForm/:id", get(update_patient_form))
        .route("/update/:id", post(update_patient))
        .route("/add", get(add_patient_form).post(add_patient))
        .route("/delete/:id", get(delete_patient));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/patientFront", patient_routes)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
