//! Timeout-bounded HTTP access to the API gateway.
//!
//! Every failure leaves this module as an [`ApiError`] wrapped in
//! [`AppError::Timeout`] or [`AppError::Transport`]. Requests are never
//! retried.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use super::metrics::record_request;
use super::session_store::SessionStore;
use crate::adapters::{invalid_response, WireCall};
use mediscan_core::config::ApiSettings;
use mediscan_core::error::UNKNOWN_ERROR;
use mediscan_core::observability::{TracedClientExt, TracedRequest};
use mediscan_core::{ApiError, AppError};

const FALLBACK_MESSAGE: &str = "Request failed";

enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

struct RawResponse {
    status: StatusCode,
    is_json: bool,
    bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    session: SessionStore,
}

impl GatewayClient {
    pub fn new(settings: &ApiSettings, session: SessionStore) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_millis(settings.timeout_ms),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send a request and return the parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let body = match body {
            Some(value) => Body::Json(value.clone()),
            None => Body::Empty,
        };
        let raw = self.exchange(method, path, body).await?;
        Ok(parse_success_body(&raw))
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, AppError> {
        let value = self.request(method, path, body).await?;
        typed(value)
    }

    pub async fn call(&self, call: &WireCall) -> Result<Value, AppError> {
        self.request(call.method.clone(), &call.path, call.body.as_ref())
            .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let value = self.request(Method::GET, path, None).await?;
        typed(value)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let value = self.request(Method::POST, path, Some(&to_value(body)?)).await?;
        typed(value)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let value = self.request(Method::PUT, path, Some(&to_value(body)?)).await?;
        typed(value)
    }

    pub async fn delete(&self, path: &str) -> Result<Value, AppError> {
        self.request(Method::DELETE, path, None).await
    }

    /// POST a multipart form. The transport picks the boundary.
    pub async fn post_form_data<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, AppError> {
        let raw = self
            .exchange(Method::POST, path, Body::Multipart(form))
            .await?;
        typed(parse_success_body(&raw))
    }

    /// GET a binary payload such as a PDF.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let raw = self.exchange(Method::GET, path, Body::Empty).await?;
        Ok(raw.bytes)
    }

    async fn exchange(&self, method: Method, path: &str, body: Body) -> Result<RawResponse, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = Uuid::new_v4().to_string();
        let endpoint = endpoint_label(path);
        let started = Instant::now();

        debug!(%request_id, %method, path, "Gateway request");

        let mut request: TracedRequest = self.client.traced_request(method.clone(), &url);
        match self.session.access_token() {
            Ok(Some(token)) => request = request.bearer_auth(token),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Session unreadable, sending without credentials"),
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };

        let outcome = tokio::time::timeout(self.timeout, async {
            let response = request.send_with_request_id(&request_id).await?;
            let status = response.status();
            let is_json = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("json"))
                .unwrap_or(false);
            let bytes = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                is_json,
                bytes,
            })
        })
        .await;

        let result = match outcome {
            Err(_) => {
                warn!(%request_id, %method, path, timeout_ms = self.timeout.as_millis() as u64, "Gateway request timed out");
                Err(ApiError::timeout())
            }
            Ok(Err(e)) => {
                warn!(%request_id, %method, path, error = %e, "Gateway request failed");
                Err(ApiError::network(format!("Network error: {}", e)))
            }
            Ok(Ok(raw)) if raw.status.is_success() => Ok(raw),
            Ok(Ok(raw)) => {
                let err = error_from_response(&raw);
                warn!(
                    %request_id,
                    %method,
                    path,
                    status = err.status,
                    code = %err.code,
                    "Gateway returned an error"
                );
                Err(err)
            }
        };

        let label = match &result {
            Ok(_) => "success",
            Err(e) if e.status == 408 => "timeout",
            Err(e) if e.status == 0 => "network_error",
            Err(e) if e.status >= 500 => "server_error",
            Err(_) => "client_error",
        };
        record_request(method.as_str(), &endpoint, label, started.elapsed());

        result.map_err(AppError::from)
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value, AppError> {
    serde_json::to_value(body)
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to encode request body: {}", e)))
}

fn typed<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone())
        .map_err(|e| invalid_response(format!("Unexpected response shape: {}", e), value))
}

/// Empty bodies become `{}`; anything that is not JSON is wrapped as
/// `{"message": text}`.
fn parse_success_body(raw: &RawResponse) -> Value {
    if raw.bytes.iter().all(u8::is_ascii_whitespace) {
        return json!({});
    }
    if raw.is_json {
        if let Ok(value) = serde_json::from_slice(&raw.bytes) {
            return value;
        }
    }
    json!({ "message": String::from_utf8_lossy(&raw.bytes) })
}

fn error_from_response(raw: &RawResponse) -> ApiError {
    let status = raw.status.as_u16();

    match serde_json::from_slice::<Value>(&raw.bytes) {
        Ok(body) if body.is_object() => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(FALLBACK_MESSAGE);
            let code = body
                .get("code")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .unwrap_or(UNKNOWN_ERROR);
            let mut err = ApiError::new(message, code, status);
            if let Some(details) = body.get("details").filter(|d| !d.is_null()) {
                err = err.with_details(details.clone());
            }
            err
        }
        _ => ApiError::new(
            raw.status.canonical_reason().unwrap_or(FALLBACK_MESSAGE),
            UNKNOWN_ERROR,
            status,
        ),
    }
}

/// Collapse id-like path segments so metric labels stay bounded.
/// Version segments such as `v1` are route structure and stay as they are.
fn endpoint_label(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    path.split('/')
        .map(|segment| if is_id_segment(segment) { ":id" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_id_segment(segment: &str) -> bool {
    let is_version = segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
    !is_version && segment.chars().any(|c| c.is_ascii_digit() || c == '%' || c == '@')
}
