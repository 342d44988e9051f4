//! W3C Trace Context propagation for service-to-service calls.
//!
//! Outbound requests built through [`TracedClientExt`] carry the current
//! span's `traceparent`/`tracestate` and, when known, the inbound
//! `x-request-id`, so a browser request can be followed across both tiers.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject current trace context into HTTP request headers.
///
/// Does nothing when there is no valid OpenTelemetry span in scope.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if span_context.is_valid() {
        // version-trace_id-span_id-trace_flags
        let traceparent = format!(
            "00-{}-{}-{:02x}",
            span_context.trace_id(),
            span_context.span_id(),
            span_context.trace_flags().to_u8()
        );

        if let Ok(value) = traceparent.parse() {
            headers.insert(TRACEPARENT_HEADER, value);
        }

        let tracestate_str = span_context.trace_state().header();
        if !tracestate_str.is_empty()
            && let Ok(value) = tracestate_str.parse()
        {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }
}

/// Inject trace context and optional request ID into headers.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: Option<&str>) {
    inject_trace_context(headers);

    if let Some(id) = request_id
        && let Ok(value) = id.parse()
    {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// A reqwest request builder that injects trace headers when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
    request_id: Option<String>,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self {
            request,
            request_id: None,
        }
    }

    /// Set a header from an already-encoded value. The bytes are sent as is.
    pub fn header(self, name: HeaderName, value: HeaderValue) -> Self {
        Self {
            request: self.request.header(name, value),
            ..self
        }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
            ..self
        }
    }

    /// Correlate the outbound call with an inbound request ID.
    pub fn request_id(self, request_id: Option<&str>) -> Self {
        Self {
            request_id: request_id.map(str::to_string),
            ..self
        }
    }

    /// Send the request with trace context headers injected.
    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, self.request_id.as_deref());

        self.request.headers(headers).send().await
    }
}

/// Extension trait for reqwest::Client to create traced requests.
pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
    fn traced_delete(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }

    fn traced_delete(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.delete(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_without_span_adds_only_request_id() {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some("req-7"));

        assert!(headers.get(TRACEPARENT_HEADER).is_none());
        assert_eq!(headers.get(REQUEST_ID_HEADER).unwrap(), "req-7");
    }

    #[test]
    fn test_traced_request_keeps_header_bytes() {
        let client = reqwest::Client::new();
        let value = HeaderValue::from_static("Bearer tok1");
        let request = client
            .traced_get("http://localhost/patientBack/list")
            .header(reqwest::header::AUTHORIZATION, value.clone())
            .request
            .build()
            .unwrap();

        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION),
            Some(&value)
        );
    }
}
