use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use super::{
    exists_from_available, id_to_string, invalid_response, str_field, Capabilities, LoginContext,
    WireAdapter, WireCall,
};
use crate::config::iam;
use crate::models::auth::default_expires_in;
use crate::models::{
    LoginRequest, LoginResponse, ProfessionalData, RegisterRequest, RegisterResponse, UserProfile,
    VerifyEmailResponse,
};
use crate::utils::resolve_path;
use crate::utils::token::{generate_token_at, now_millis, TokenKind};
use mediscan_core::config::BackendVariant;
use mediscan_core::AppError;

pub const DOCTOR_ROLE: &str = "DOCTOR";

/// IAM service: `*Dto` register keys, `{success, message, user}` envelopes,
/// numeric user ids and no tokens.
#[derive(Debug, Clone)]
pub struct IamAdapter {
    prefix: String,
}

impl IamAdapter {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    fn path(&self, endpoint: &str) -> String {
        format!("{}{}", self.prefix, endpoint)
    }

    /// Unwrap the `{success, user}` envelope or surface its message.
    fn user_from_envelope<'a>(wire: &'a Value, fallback: &str) -> Result<&'a Value, String> {
        let success = wire.get("success").and_then(Value::as_bool).unwrap_or(false);
        match wire.get("user").filter(|u| u.is_object()) {
            Some(user) if success => Ok(user),
            _ => Err(str_field(wire, "message")
                .or_else(|| str_field(wire, "error"))
                .unwrap_or_else(|| fallback.to_string())),
        }
    }

    fn adapt_user(user: &Value, issued_at: i64) -> Option<UserProfile> {
        let id = id_to_string(user.get("id"))?;
        let stamp = Utc
            .timestamp_millis_opt(issued_at)
            .single()
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        Some(UserProfile {
            id,
            name: str_field(user, "name").unwrap_or_default(),
            email: str_field(user, "email").unwrap_or_default(),
            phone: str_field(user, "phone").unwrap_or_default(),
            created_at: stamp.clone(),
            updated_at: stamp,
            ..Default::default()
        })
    }
}

impl WireAdapter for IamAdapter {
    fn variant(&self) -> BackendVariant {
        BackendVariant::Iam
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            reset_password: false,
            refresh_token: false,
            remote_logout: false,
        }
    }

    fn login_path(&self) -> String {
        self.path(iam::LOGIN)
    }

    fn register_path(&self) -> String {
        self.path(iam::REGISTER)
    }

    fn adapt_login_request(&self, request: &LoginRequest) -> Value {
        json!({
            "username": request.email,
            "password": request.password,
        })
    }

    fn adapt_login_response(
        &self,
        wire: Value,
        _request: &LoginRequest,
        context: &LoginContext,
    ) -> Result<LoginResponse, AppError> {
        let user = Self::user_from_envelope(&wire, "Login failed").map_err(AppError::AuthError)?;
        let mut profile = match Self::adapt_user(user, context.issued_at) {
            Some(profile) => profile,
            None => return Err(invalid_response("IAM user has no id", wire)),
        };
        if let Some(data) = &context.professional_data {
            profile.merge_professional_data(data);
        }

        Ok(LoginResponse {
            access_token: generate_token_at(TokenKind::Access, &profile.id, context.issued_at),
            refresh_token: generate_token_at(TokenKind::Refresh, &profile.id, context.issued_at),
            expires_in: default_expires_in(),
            user: profile,
        })
    }

    fn adapt_register_request(&self, request: &RegisterRequest) -> Value {
        json!({
            "usernameDto": request.email,
            "passwordDto": request.password,
            "nameDto": request.name,
            "emailDto": request.email,
            "phoneDto": request.phone,
            "roleDto": DOCTOR_ROLE,
        })
    }

    fn adapt_register_response(
        &self,
        wire: Value,
        request: &RegisterRequest,
    ) -> Result<(RegisterResponse, Option<ProfessionalData>), AppError> {
        let user =
            Self::user_from_envelope(&wire, "Registration failed").map_err(AppError::ValidationError)?;
        let mut profile = match Self::adapt_user(user, now_millis()) {
            Some(profile) => profile,
            None => return Err(invalid_response("IAM user has no id", wire)),
        };

        let professional = ProfessionalData {
            dni: request.dni.clone(),
            specialty: request.specialty.clone(),
            professional_id: request.professional_id.clone(),
            hospital: request.hospital.clone(),
        };
        profile.merge_professional_data(&professional);

        let response = RegisterResponse {
            user: profile,
            message: str_field(&wire, "message")
                .unwrap_or_else(|| "User registered successfully".to_string()),
        };
        Ok((response, Some(professional)))
    }

    fn verify_email_call(&self, email: &str) -> WireCall {
        WireCall::get(resolve_path(&self.path(iam::CHECK_EMAIL), &[("email", email)]))
    }

    fn adapt_verify_email_response(
        &self,
        wire: Value,
        email: &str,
    ) -> Result<VerifyEmailResponse, AppError> {
        if !wire.get("success").and_then(Value::as_bool).unwrap_or(false) {
            let message = str_field(&wire, "message")
                .or_else(|| str_field(&wire, "error"))
                .unwrap_or_else(|| "Email check failed".to_string());
            return Err(invalid_response(message, wire));
        }
        exists_from_available(wire, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::token::{decode_token_at, validate_token_at};

    const ISSUED: i64 = 1_736_500_000_000;

    fn adapter() -> IamAdapter {
        IamAdapter::new("/v1/iam/")
    }

    fn context() -> LoginContext {
        LoginContext {
            issued_at: ISSUED,
            professional_data: None,
        }
    }

    #[test]
    fn test_paths_use_prefix() {
        let adapter = adapter();
        assert_eq!(adapter.login_path(), "/v1/iam/login");
        assert_eq!(adapter.register_path(), "/v1/iam/register");
        assert_eq!(
            adapter.verify_email_call("a@h.com").path,
            "/v1/iam/check-email/a%40h.com"
        );
    }

    #[test]
    fn test_login_request_uses_username() {
        assert_eq!(
            adapter().adapt_login_request(&LoginRequest::new("doc@h.com", "secret1")),
            json!({"username": "doc@h.com", "password": "secret1"})
        );
    }

    #[test]
    fn test_register_request_injects_doctor_role() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@h.com".to_string(),
            password: "supersecret".to_string(),
            dni: "12345678".to_string(),
            specialty: "Radiology".to_string(),
            professional_id: "4411".to_string(),
            hospital: "Central".to_string(),
            phone: "999888777".to_string(),
        };
        let wire = adapter().adapt_register_request(&request);
        assert_eq!(wire["roleDto"], "DOCTOR");
        assert_eq!(wire["usernameDto"], "ana@h.com");
        assert_eq!(wire["emailDto"], "ana@h.com");
        assert_eq!(wire["phoneDto"], "999888777");
    }

    #[test]
    fn test_login_response_stringifies_id_and_synthesizes_tokens() {
        let wire = json!({
            "success": true,
            "message": "ok",
            "user": {"id": 1, "username": "doc@h.com", "name": "Doc", "email": "doc@h.com", "phone": "1", "role": "DOCTOR"}
        });
        let response = adapter()
            .adapt_login_response(wire, &LoginRequest::new("doc@h.com", "secret1"), &context())
            .unwrap();

        assert_eq!(response.user.id, "1");
        assert_eq!(response.expires_in, 3600);
        assert!(validate_token_at(&response.access_token, ISSUED));
        let payload = decode_token_at(&response.refresh_token, ISSUED).unwrap();
        assert_eq!(payload.subject_id, "1");
        assert_eq!(payload.kind, TokenKind::Refresh);
        assert!(response.user.dni.is_empty());
    }

    #[test]
    fn test_login_response_merges_trusted_professional_data() {
        let wire = json!({"success": true, "user": {"id": 3, "name": "Doc", "email": "d@h.com"}});
        let ctx = LoginContext {
            issued_at: ISSUED,
            professional_data: Some(ProfessionalData {
                dni: "12345678".to_string(),
                hospital: "Central".to_string(),
                ..Default::default()
            }),
        };
        let response = adapter()
            .adapt_login_response(wire, &LoginRequest::new("d@h.com", "secret1"), &ctx)
            .unwrap();
        assert_eq!(response.user.dni, "12345678");
        assert_eq!(response.user.hospital, "Central");
    }

    #[test]
    fn test_login_failure_surfaces_message() {
        for wire in [
            json!({"success": false, "message": "Bad credentials"}),
            json!({"success": true, "message": "Bad credentials"}),
        ] {
            match adapter().adapt_login_response(
                wire,
                &LoginRequest::new("doc@h.com", "secret1"),
                &context(),
            ) {
                Err(AppError::AuthError(msg)) => assert_eq!(msg, "Bad credentials"),
                other => panic!("Expected AuthError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_register_response_returns_side_cache() {
        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@h.com".to_string(),
            password: "supersecret".to_string(),
            dni: "12345678".to_string(),
            specialty: "Radiology".to_string(),
            professional_id: "4411".to_string(),
            hospital: "Central".to_string(),
            phone: "999888777".to_string(),
        };
        let wire = json!({"success": true, "user": {"id": 8, "name": "Ana", "email": "ana@h.com"}});
        let (response, cache) = adapter().adapt_register_response(wire, &request).unwrap();

        assert_eq!(response.user.id, "8");
        assert_eq!(response.user.specialty, "Radiology");
        assert_eq!(response.message, "User registered successfully");
        assert_eq!(cache.unwrap().professional_id, "4411");
    }

    #[test]
    fn test_verify_email_failure_envelope_surfaces_backend_message() {
        let err = adapter()
            .adapt_verify_email_response(
                json!({"success": false, "message": "Servicio de correo caido"}),
                "doc@h.com",
            )
            .unwrap_err();
        assert_eq!(err.user_message(), "Servicio de correo caido");

        let err = adapter()
            .adapt_verify_email_response(
                json!({"success": false, "available": false, "message": "Servicio de correo caido"}),
                "doc@h.com",
            )
            .unwrap_err();
        assert_eq!(err.user_message(), "Servicio de correo caido");
    }

    #[test]
    fn test_verify_email_success_envelope_reads_available() {
        let response = adapter()
            .adapt_verify_email_response(json!({"success": true, "available": false}), "doc@h.com")
            .unwrap();
        assert!(response.exists);
    }
}
