use crate::services::get_metrics;
use axum::{http::StatusCode, response::IntoResponse};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
