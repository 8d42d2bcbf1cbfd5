use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{check_dni, check_profile_phone};
use mediscan_core::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub professional_id: String,
    #[serde(default)]
    pub hospital: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl UserProfile {
    /// Fill blank professional fields from a client-side cache.
    pub fn merge_professional_data(&mut self, data: &ProfessionalData) {
        fn fill(target: &mut String, source: &str) {
            if target.is_empty() {
                *target = source.to_string();
            }
        }
        fill(&mut self.dni, &data.dni);
        fill(&mut self.specialty, &data.specialty);
        fill(&mut self.professional_id, &data.professional_id);
        fill(&mut self.hospital, &data.hospital);
    }
}

/// Registration fields some backends accept but never echo back.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalData {
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub professional_id: String,
    #[serde(default)]
    pub hospital: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    /// Derive-based rules plus the format checks for DNI and phone.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if let Some(dni) = self.dni.as_deref().filter(|d| !d.is_empty()) {
            check_dni(dni)?;
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            check_profile_phone(phone)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_camel_case_with_missing_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": "7",
            "name": "Ana Torres",
            "email": "ana@h.com",
            "professionalId": "CMP-1"
        }))
        .unwrap();

        assert_eq!(profile.professional_id, "CMP-1");
        assert_eq!(profile.dni, "");
        assert_eq!(profile.created_at, "");
    }

    #[test]
    fn test_merge_only_fills_blank_fields() {
        let mut profile = UserProfile {
            specialty: "Cardiology".to_string(),
            ..Default::default()
        };
        profile.merge_professional_data(&ProfessionalData {
            dni: "12345678".to_string(),
            specialty: "Radiology".to_string(),
            professional_id: "CMP-9".to_string(),
            hospital: "Central".to_string(),
        });

        assert_eq!(profile.dni, "12345678");
        assert_eq!(profile.specialty, "Cardiology");
        assert_eq!(profile.hospital, "Central");
    }

    #[test]
    fn test_update_request_omits_absent_fields() {
        let request = UpdateProfileRequest {
            hospital: Some("Central".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"hospital": "Central"})
        );
    }

    #[test]
    fn test_update_request_rejects_bad_dni() {
        let request = UpdateProfileRequest {
            dni: Some("12AB".to_string()),
            ..Default::default()
        };
        assert!(matches!(request.check(), Err(AppError::ValidationError(_))));
    }
}
