use axum::{extract::Request, http::header::AUTHORIZATION, middleware::Next, response::Response};
use service_core::error::AppError;

/// Reject requests that carry no `Authorization` header. The value itself is
/// not inspected.
pub async fn require_authorization(request: Request, next: Next) -> Result<Response, AppError> {
    if !request.headers().contains_key(AUTHORIZATION) {
        tracing::warn!(path = %request.uri().path(), "Request without Authorization header");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Missing Authorization header"
        )));
    }

    Ok(next.run(request).await)
}
