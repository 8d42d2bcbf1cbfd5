use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};

use super::gateway::GatewayClient;
use crate::config::analysis;
use crate::models::{Analysis, AnalysisListResponse, PaginationParams, UploadAnalysisRequest};
use crate::utils::resolve_path;
use mediscan_core::AppError;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AnalysisService {
    gateway: GatewayClient,
}

impl AnalysisService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self, request), fields(analysis_type = request.analysis_type.as_str()))]
    pub async fn upload_analysis(&self, request: UploadAnalysisRequest) -> Result<Analysis, AppError> {
        let form = build_upload_form(request)?;
        let created: Analysis = self.gateway.post_form_data(analysis::UPLOAD, form).await?;
        info!(analysis_id = %created.id, "Analysis uploaded");
        Ok(created)
    }

    pub async fn get_analysis(&self, id: &str) -> Result<Analysis, AppError> {
        self.gateway
            .get(&resolve_path(analysis::BY_ID, &[("id", id)]))
            .await
    }

    pub async fn list_analyses(
        &self,
        params: &PaginationParams,
    ) -> Result<AnalysisListResponse, AppError> {
        self.gateway.get(&params.apply(analysis::LIST)).await
    }

    /// Returns the backend's `success` flag.
    pub async fn delete_analysis(&self, id: &str) -> Result<bool, AppError> {
        let wire = self
            .gateway
            .request(
                Method::DELETE,
                &resolve_path(analysis::BY_ID, &[("id", id)]),
                None,
            )
            .await?;
        Ok(wire.get("success").and_then(Value::as_bool).unwrap_or(false))
    }
}

fn build_upload_form(request: UploadAnalysisRequest) -> Result<Form, AppError> {
    let image = request.image;
    if !image.content_type.starts_with("image/") {
        return Err(AppError::ValidationError(
            "Only image files can be analyzed".to_string(),
        ));
    }
    if image.data.is_empty() {
        return Err(AppError::ValidationError("Image file is empty".to_string()));
    }
    if image.data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::ValidationError(
            "Image must not exceed 10 MB".to_string(),
        ));
    }

    let part = Part::bytes(image.data)
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .map_err(|_| AppError::ValidationError("Unsupported image content type".to_string()))?;

    let mut form = Form::new()
        .part("image", part)
        .text("analysisType", request.analysis_type.as_str());
    if let Some(patient_id) = request.patient_id.filter(|p| !p.is_empty()) {
        form = form.text("patientId", patient_id);
    }
    if let Some(notes) = request.notes.filter(|n| !n.is_empty()) {
        form = form.text("notes", notes);
    }
    Ok(form)
}
