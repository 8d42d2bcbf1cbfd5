//! W3C Trace Context propagation for outgoing gateway calls.
//!
//! Every request leaving the client carries `traceparent`/`tracestate` when a
//! span context is active, plus an `x-request-id` so backend logs can be
//! correlated with the client's.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject the current span's trace context into outgoing headers.
///
/// Leaves `headers` untouched when no valid span context is active.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

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

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty() {
        if let Ok(value) = tracestate.parse() {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }
}

/// Inject trace context and a request ID.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: Option<&str>) {
    inject_trace_context(headers);

    if let Some(value) = request_id.and_then(|id| id.parse().ok()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// A `reqwest::RequestBuilder` that injects trace headers when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    pub fn header(self, key: &str, value: &str) -> Self {
        Self {
            request: self.request.header(key, value),
        }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
        }
    }

    /// Attach a multipart body. The transport sets the `Content-Type`
    /// header, boundary included.
    pub fn multipart(self, form: reqwest::multipart::Form) -> Self {
        Self {
            request: self.request.multipart(form),
        }
    }

    pub fn bearer_auth<T: std::fmt::Display>(self, token: T) -> Self {
        Self {
            request: self.request.bearer_auth(token),
        }
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        self.request.headers(headers).send().await
    }

    pub async fn send_with_request_id(
        self,
        request_id: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some(request_id));

        self.request.headers(headers).send().await
    }
}

/// Extension trait for `reqwest::Client` to create traced requests.
pub trait TracedClientExt {
    fn traced_request(&self, method: Method, url: &str) -> TracedRequest;

    fn traced_get(&self, url: &str) -> TracedRequest {
        self.traced_request(Method::GET, url)
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        self.traced_request(Method::POST, url)
    }
}

impl TracedClientExt for reqwest::Client {
    fn traced_request(&self, method: Method, url: &str) -> TracedRequest {
        TracedRequest::new(self.request(method, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_empty_context() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        // No active span, nothing to propagate
        assert!(headers.is_empty());
    }

    #[test]
    fn test_inject_request_id_without_span() {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some("req-42"));

        assert_eq!(
            headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("req-42")
        );
        assert!(headers.get(TRACEPARENT_HEADER).is_none());
    }

    #[test]
    fn test_invalid_request_id_is_skipped() {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some("bad\nvalue"));
        assert!(headers.is_empty());
    }
}
