use tracing::instrument;

use super::gateway::GatewayClient;
use crate::config::reports;
use crate::models::{PaginationParams, Report, ReportListResponse};
use crate::utils::resolve_path;
use mediscan_core::AppError;

#[derive(Clone)]
pub struct ReportService {
    gateway: GatewayClient,
}

impl ReportService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub async fn get_report(&self, id: &str) -> Result<Report, AppError> {
        self.gateway
            .get(&resolve_path(reports::BY_ID, &[("id", id)]))
            .await
    }

    pub async fn list_reports(
        &self,
        params: &PaginationParams,
    ) -> Result<ReportListResponse, AppError> {
        self.gateway.get(&params.apply(reports::LIST)).await
    }

    /// Raw report document, typically a PDF.
    #[instrument(skip(self))]
    pub async fn download_report(&self, id: &str) -> Result<Vec<u8>, AppError> {
        let bytes = self
            .gateway
            .get_bytes(&resolve_path(reports::DOWNLOAD, &[("id", id)]))
            .await?;
        tracing::info!(report_id = %id, size = bytes.len(), "Report downloaded");
        Ok(bytes)
    }
}
