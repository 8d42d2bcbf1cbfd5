use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub analysis_id: String,
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub analysis_type: String,
    #[serde(default)]
    pub result: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}
