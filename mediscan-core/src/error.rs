use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
pub const INVALID_RESPONSE: &str = "INVALID_RESPONSE";

/// Uniform failure shape surfaced to callers regardless of backend format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub code: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            status,
            details: None,
        }
    }

    pub fn timeout() -> Self {
        Self::new("Request timed out", TIMEOUT_ERROR, 408)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, NETWORK_ERROR, 0)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// True for failures where a cached copy is a reasonable substitute:
    /// no connection, a timeout, or a server-side fault.
    pub fn is_unavailable(&self) -> bool {
        self.status == 0 || self.status == 408 || self.status >= 500
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, status {})", self.message, self.code, self.status)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Timeout: {0}")]
    Timeout(ApiError),

    #[error("Transport error: {0}")]
    Transport(ApiError),

    #[error("Not available: {0}")]
    NotImplemented(String),

    #[error("Storage error: {0}")]
    StorageError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();

        if messages.is_empty() {
            AppError::ValidationError("Invalid input".to_string())
        } else {
            AppError::ValidationError(messages.join("; "))
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        if err.code == TIMEOUT_ERROR {
            AppError::Timeout(err)
        } else {
            AppError::Transport(err)
        }
    }
}

impl AppError {
    /// Render any failure into the uniform `ApiError` shape.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            AppError::ValidationError(msg) => ApiError::new(msg.clone(), "VALIDATION_ERROR", 400),
            AppError::AuthError(msg) => ApiError::new(msg.clone(), "AUTH_ERROR", 401),
            AppError::Timeout(err) | AppError::Transport(err) => err.clone(),
            AppError::NotImplemented(msg) => ApiError::new(msg.clone(), "NOT_IMPLEMENTED", 501),
            AppError::StorageError(err) => ApiError::new(
                "Local session storage is unavailable",
                "STORAGE_ERROR",
                500,
            )
            .with_details(serde_json::Value::String(err.to_string())),
            AppError::ConfigError(err) => {
                ApiError::new("Configuration error", "CONFIG_ERROR", 500)
                    .with_details(serde_json::Value::String(err.to_string()))
            }
            AppError::InternalError(err) => {
                ApiError::new("Internal error", "INTERNAL_ERROR", 500)
                    .with_details(serde_json::Value::String(format!("{:#}", err)))
            }
        }
    }

    /// Human-readable text for inline display next to a form.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::AuthError(msg)
            | AppError::NotImplemented(msg) => msg.clone(),
            AppError::Timeout(_) => "The server took too long to respond".to_string(),
            AppError::Transport(err) if !err.message.is_empty() => err.message.clone(),
            AppError::Transport(_) => "Unknown server error".to_string(),
            AppError::StorageError(_) => "Local session storage is unavailable".to_string(),
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                "Unexpected error, please try again".to_string()
            }
        }
    }

    pub fn status(&self) -> u16 {
        self.to_api_error().status
    }
}
