use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserProfile;
use crate::utils::validation::{check_dni, check_register_phone, require};
use mediscan_core::AppError;

/// Login credentials. Never persisted.
#[derive(Clone, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub remember_me: Option<bool>,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            remember_me: None,
        }
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("remember_me", &self.remember_me)
            .finish()
    }
}

/// Authenticated session as issued (or synthesized) at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Epoch millis at which the session was stored.
    pub issued_at: i64,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn expires_at_millis(&self) -> i64 {
        self.issued_at.saturating_add(self.expires_in.saturating_mul(1000))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

pub(crate) fn default_expires_in() -> i64 {
    3600
}

impl LoginResponse {
    pub fn session(&self, issued_at: i64) -> Session {
        Session {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expires_in: self.expires_in,
            issued_at,
        }
    }
}

#[derive(Clone, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub dni: String,
    pub specialty: String,
    pub professional_id: String,
    pub hospital: String,
    pub phone: String,
}

impl RegisterRequest {
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        check_dni(&self.dni)?;
        require(&self.specialty, "Specialty is required")?;
        require(&self.professional_id, "Professional ID is required")?;
        require(&self.hospital, "Hospital is required")?;
        check_register_phone(&self.phone)?;
        Ok(())
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("specialty", &self.specialty)
            .field("hospital", &self.hospital)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyEmailResponse {
    pub exists: bool,
    pub email: String,
}

#[derive(Clone, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

impl std::fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("email", &self.email)
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPasswordResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Ana Torres".to_string(),
            email: "ana@h.com".to_string(),
            password: "supersecret".to_string(),
            dni: "12345678".to_string(),
            specialty: "Radiology".to_string(),
            professional_id: "4411".to_string(),
            hospital: "Central".to_string(),
            phone: "+51 999-888-777".to_string(),
        }
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let request = LoginRequest::new("doc@h.com", "secret1");
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("doc@h.com"));
        assert!(!rendered.contains("secret1"));
    }

    #[test]
    fn test_login_request_rejects_short_password() {
        let request = LoginRequest::new("doc@h.com", "123");
        let err: AppError = request.validate().unwrap_err().into();
        assert_eq!(
            err.user_message(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register_request().check().is_ok());
    }

    #[test]
    fn test_register_request_requires_hospital() {
        let mut request = register_request();
        request.hospital = "   ".to_string();
        match request.check() {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Hospital is required"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_register_request_rejects_short_phone() {
        let mut request = register_request();
        request.phone = "12345".to_string();
        assert!(matches!(request.check(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_login_response_defaults_expiry() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "user": {"id": "1", "name": "Doc", "email": "doc@h.com"},
            "accessToken": "abc",
            "refreshToken": "def"
        }))
        .unwrap();
        assert_eq!(response.expires_in, 3600);
        let session = response.session(1_000);
        assert!(session.is_authenticated());
        assert_eq!(session.expires_at_millis(), 3_601_000);
    }
}
