use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable selecting the API gateway target.
pub const API_GATEWAY_URL_ENV: &str = "API_GATEWAY_URL";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

/// Which backend contract the wire adapter speaks.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendVariant {
    /// REST gateway speaking the canonical camelCase contract.
    #[default]
    Gateway,
    /// IAM service that issues no tokens and wraps users in `{success, user}`.
    Iam,
    /// Spanish-keyed legacy auth service.
    Legacy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub backend: BackendVariant,
    /// Path prefix of the IAM service under the base URL.
    #[serde(default = "default_iam_prefix")]
    pub iam_prefix: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            backend: BackendVariant::default(),
            iam_prefix: default_iam_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    /// JSON file backing the session store. In-memory when unset.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Merge the client-side professional data cache into login profiles.
    /// Off by default so the backend stays the only source of profile fields.
    #[serde(default)]
    pub trust_professional_cache: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_iam_prefix() -> String {
    "/v1/iam".to_string()
}

fn default_service_name() -> String {
    "mediscan-client".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from an optional `configuration` file, `APP_*`
    /// environment variables and the `API_GATEWAY_URL` override.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var(API_GATEWAY_URL_ENV).ok())?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "api.base_url must not be empty"
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "api.timeout_ms must be greater than zero"
            )));
        }
        Ok(())
    }
}
