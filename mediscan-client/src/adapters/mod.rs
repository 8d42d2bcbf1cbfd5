//! Translation between domain DTOs and backend payload shapes.
//!
//! The gateway contract is canonical. The IAM and legacy backends are adapted
//! into it: they issue no tokens, so their login responses get a synthesized
//! session from [`crate::utils::token`]. Adapters never touch the network or
//! the session store.

pub mod gateway;
pub mod iam;
pub mod legacy;

pub use gateway::GatewayAdapter;
pub use iam::IamAdapter;
pub use legacy::LegacyAdapter;

use crate::models::{
    LoginRequest, LoginResponse, ProfessionalData, RegisterRequest, RegisterResponse,
    VerifyEmailResponse,
};
use mediscan_core::config::BackendVariant;
use mediscan_core::error::INVALID_RESPONSE;
use mediscan_core::{ApiError, AppError};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

/// One outgoing request, fully described.
#[derive(Debug, Clone, PartialEq)]
pub struct WireCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl WireCall {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Inputs a login response adapter needs besides the wire body.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    /// Epoch millis used for synthesized tokens and timestamps.
    pub issued_at: i64,
    /// Cached registration data, present only when the caller trusts it.
    pub professional_data: Option<ProfessionalData>,
}

/// Operations a backend variant supports beyond login and register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub reset_password: bool,
    pub refresh_token: bool,
    pub remote_logout: bool,
}

pub trait WireAdapter: Send + Sync {
    fn variant(&self) -> BackendVariant;

    fn capabilities(&self) -> Capabilities;

    fn login_path(&self) -> String;

    fn register_path(&self) -> String;

    fn adapt_login_request(&self, request: &LoginRequest) -> Value;

    fn adapt_login_response(
        &self,
        wire: Value,
        request: &LoginRequest,
        context: &LoginContext,
    ) -> Result<LoginResponse, AppError>;

    fn adapt_register_request(&self, request: &RegisterRequest) -> Value;

    /// Returns the professional data the caller should cache, if any.
    fn adapt_register_response(
        &self,
        wire: Value,
        request: &RegisterRequest,
    ) -> Result<(RegisterResponse, Option<ProfessionalData>), AppError>;

    fn verify_email_call(&self, email: &str) -> WireCall;

    fn adapt_verify_email_response(
        &self,
        wire: Value,
        email: &str,
    ) -> Result<VerifyEmailResponse, AppError>;

    fn login_call(&self, request: &LoginRequest) -> WireCall {
        WireCall::post(self.login_path(), self.adapt_login_request(request))
    }

    fn register_call(&self, request: &RegisterRequest) -> WireCall {
        WireCall::post(self.register_path(), self.adapt_register_request(request))
    }
}

pub fn adapter_for(variant: BackendVariant, iam_prefix: &str) -> Arc<dyn WireAdapter> {
    match variant {
        BackendVariant::Gateway => Arc::new(GatewayAdapter),
        BackendVariant::Iam => Arc::new(IamAdapter::new(iam_prefix)),
        BackendVariant::Legacy => Arc::new(LegacyAdapter),
    }
}

pub(crate) fn invalid_response(message: impl Into<String>, wire: Value) -> AppError {
    AppError::Transport(ApiError::new(message, INVALID_RESPONSE, 200).with_details(wire))
}

/// Stringify a numeric or string id. Anything else yields `None`.
pub(crate) fn id_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub(crate) fn str_field(wire: &Value, key: &str) -> Option<String> {
    wire.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Email-existence answer from backends that report `available`.
pub(crate) fn exists_from_available(
    wire: Value,
    email: &str,
) -> Result<VerifyEmailResponse, AppError> {
    match wire.get("available").and_then(Value::as_bool) {
        Some(available) => Ok(VerifyEmailResponse {
            exists: !available,
            email: email.to_string(),
        }),
        None => Err(invalid_response(
            "Email check response is missing `available`",
            wire,
        )),
    }
}
