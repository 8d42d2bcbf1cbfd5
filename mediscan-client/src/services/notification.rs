use reqwest::Method;
use serde_json::Value;

use super::gateway::GatewayClient;
use crate::config::notifications;
use crate::models::{Notification, NotificationListResponse};
use crate::utils::resolve_path;
use mediscan_core::AppError;

#[derive(Clone)]
pub struct NotificationService {
    gateway: GatewayClient,
}

impl NotificationService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub async fn list_notifications(&self) -> Result<NotificationListResponse, AppError> {
        self.gateway.get(notifications::LIST).await
    }

    pub async fn mark_as_read(&self, id: &str) -> Result<Notification, AppError> {
        self.gateway
            .request_as(
                Method::PUT,
                &resolve_path(notifications::MARK_READ, &[("id", id)]),
                None,
            )
            .await
    }

    /// Returns the backend's `success` flag.
    pub async fn mark_all_as_read(&self) -> Result<bool, AppError> {
        let wire = self
            .gateway
            .request(Method::PUT, notifications::MARK_ALL_READ, None)
            .await?;
        Ok(wire.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}
