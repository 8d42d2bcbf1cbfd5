use std::sync::Arc;

use crate::adapters::adapter_for;
use crate::services::{
    AnalysisService, AuthService, FileStorage, GatewayClient, KeyValueStorage, MemoryStorage,
    NotificationService, ReportService, SessionStore, UserService,
};
use crate::MediscanClient;
use mediscan_core::config::{SessionSettings, Settings};
use mediscan_core::AppError;

/// File-backed when a storage path is configured, in-memory otherwise.
pub fn open_storage(settings: &SessionSettings) -> Result<Arc<dyn KeyValueStorage>, AppError> {
    match &settings.storage_path {
        Some(path) => {
            let storage = FileStorage::open(path)?;
            tracing::info!(path = %storage.path().display(), "Using file session storage");
            Ok(Arc::new(storage))
        }
        None => Ok(Arc::new(MemoryStorage::new())),
    }
}

pub fn build_client(settings: &Settings) -> Result<MediscanClient, AppError> {
    let storage = open_storage(&settings.session)?;
    build_client_with_storage(settings, storage)
}

pub fn build_client_with_storage(
    settings: &Settings,
    storage: Arc<dyn KeyValueStorage>,
) -> Result<MediscanClient, AppError> {
    let session = SessionStore::new(storage);
    let gateway = GatewayClient::new(&settings.api, session.clone())?;
    let adapter = adapter_for(settings.api.backend, &settings.api.iam_prefix);

    tracing::info!(
        base_url = %gateway.base_url(),
        backend = ?settings.api.backend,
        timeout_ms = settings.api.timeout_ms,
        "Client configured"
    );

    Ok(MediscanClient::new(
        session.clone(),
        AuthService::new(
            gateway.clone(),
            adapter,
            session.clone(),
            settings.session.trust_professional_cache,
        ),
        UserService::new(gateway.clone(), session),
        AnalysisService::new(gateway.clone()),
        ReportService::new(gateway.clone()),
        NotificationService::new(gateway),
    ))
}

/// Load layered settings, install tracing and build the client.
pub fn init() -> Result<MediscanClient, AppError> {
    let settings = Settings::load()?;
    mediscan_core::observability::init_from_settings(&settings.telemetry)?;
    build_client(&settings)
}
