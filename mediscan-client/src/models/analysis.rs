use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Radiografia,
    Tomografia,
    Resonancia,
    Ecografia,
    Mamografia,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Radiografia => "radiografia",
            AnalysisType::Tomografia => "tomografia",
            AnalysisType::Resonancia => "resonancia",
            AnalysisType::Ecografia => "ecografia",
            AnalysisType::Mamografia => "mamografia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub diagnosis: String,
    pub confidence: f64,
    #[serde(default)]
    pub findings: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: String,
    #[serde(default)]
    pub patient_id: String,
    pub analysis_type: AnalysisType,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisListResponse {
    pub analyses: Vec<Analysis>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Image to submit for analysis.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadAnalysisRequest {
    pub image: ImageUpload,
    pub analysis_type: AnalysisType,
    pub patient_id: Option<String>,
    pub notes: Option<String>,
}
