use serde_json::{json, Value};

use super::{
    exists_from_available, id_to_string, str_field, Capabilities, LoginContext, WireAdapter,
    WireCall,
};
use crate::config::auth;
use crate::models::auth::default_expires_in;
use crate::models::{
    LoginRequest, LoginResponse, ProfessionalData, RegisterRequest, RegisterResponse, UserProfile,
    VerifyEmailResponse,
};
use crate::utils::resolve_path;
use crate::utils::token::{generate_token_at, TokenKind};
use mediscan_core::config::BackendVariant;
use mediscan_core::AppError;

/// `response` value the legacy service returns on a successful registration.
pub const REGISTER_SUCCESS: &str = "Registro Exitoso";

/// Spanish-keyed auth service. Login answers `{userId, mensaje}` where a zero
/// id means rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyAdapter;

impl WireAdapter for LegacyAdapter {
    fn variant(&self) -> BackendVariant {
        BackendVariant::Legacy
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            reset_password: true,
            refresh_token: false,
            remote_logout: true,
        }
    }

    fn login_path(&self) -> String {
        auth::LOGIN.to_string()
    }

    fn register_path(&self) -> String {
        auth::REGISTER.to_string()
    }

    fn adapt_login_request(&self, request: &LoginRequest) -> Value {
        json!({
            "correo": request.email,
            "password": request.password,
        })
    }

    fn adapt_login_response(
        &self,
        wire: Value,
        request: &LoginRequest,
        context: &LoginContext,
    ) -> Result<LoginResponse, AppError> {
        let user_id = id_to_string(wire.get("userId")).filter(|id| id != "0");
        let user_id = match user_id {
            Some(id) => id,
            None => {
                return Err(AppError::AuthError(
                    str_field(&wire, "mensaje").unwrap_or_else(|| "Invalid credentials".to_string()),
                ))
            }
        };

        let mut profile = UserProfile {
            id: user_id.clone(),
            email: request.email.clone(),
            ..Default::default()
        };
        if let Some(data) = &context.professional_data {
            profile.merge_professional_data(data);
        }

        Ok(LoginResponse {
            user: profile,
            access_token: generate_token_at(TokenKind::Access, &user_id, context.issued_at),
            refresh_token: generate_token_at(TokenKind::Refresh, &user_id, context.issued_at),
            expires_in: default_expires_in(),
        })
    }

    fn adapt_register_request(&self, request: &RegisterRequest) -> Value {
        json!({
            "nombre": request.name,
            "correo": request.email,
            "password": request.password,
            "dni": request.dni,
            "especialidad": request.specialty,
            "idProfesional": request.professional_id.trim().parse::<i64>().unwrap_or(0),
            "hospital": request.hospital,
            "telefonoContacto": request.phone,
        })
    }

    fn adapt_register_response(
        &self,
        wire: Value,
        request: &RegisterRequest,
    ) -> Result<(RegisterResponse, Option<ProfessionalData>), AppError> {
        let outcome = str_field(&wire, "response");
        if outcome.as_deref() != Some(REGISTER_SUCCESS) {
            return Err(AppError::ValidationError(
                outcome.unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }

        let user = UserProfile {
            id: "0".to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            dni: request.dni.clone(),
            specialty: request.specialty.clone(),
            professional_id: request.professional_id.clone(),
            hospital: request.hospital.clone(),
            phone: request.phone.clone(),
            ..Default::default()
        };
        let response = RegisterResponse {
            user,
            message: REGISTER_SUCCESS.to_string(),
        };
        Ok((response, None))
    }

    fn verify_email_call(&self, email: &str) -> WireCall {
        WireCall::get(resolve_path(auth::VERIFY_EMAIL_BY_PATH, &[("email", email)]))
    }

    fn adapt_verify_email_response(
        &self,
        wire: Value,
        email: &str,
    ) -> Result<VerifyEmailResponse, AppError> {
        exists_from_available(wire, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::token::validate_token_at;

    const ISSUED: i64 = 1_736_500_000_000;

    fn register_request(professional_id: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana Torres".to_string(),
            email: "ana@h.com".to_string(),
            password: "supersecret".to_string(),
            dni: "12345678".to_string(),
            specialty: "Radiology".to_string(),
            professional_id: professional_id.to_string(),
            hospital: "Central".to_string(),
            phone: "999888777".to_string(),
        }
    }

    #[test]
    fn test_login_request_uses_correo() {
        assert_eq!(
            LegacyAdapter.adapt_login_request(&LoginRequest::new("doc@h.com", "secret1")),
            json!({"correo": "doc@h.com", "password": "secret1"})
        );
    }

    #[test]
    fn test_register_request_coerces_professional_id() {
        let wire = LegacyAdapter.adapt_register_request(&register_request("4411"));
        assert_eq!(wire["idProfesional"], json!(4411));
        assert_eq!(wire["especialidad"], "Radiology");
        assert_eq!(wire["telefonoContacto"], "999888777");

        let wire = LegacyAdapter.adapt_register_request(&register_request("CMP-12"));
        assert_eq!(wire["idProfesional"], json!(0));
    }

    #[test]
    fn test_login_response_zero_id_is_rejected() {
        let err = LegacyAdapter
            .adapt_login_response(
                json!({"userId": 0, "mensaje": "Credenciales incorrectas"}),
                &LoginRequest::new("doc@h.com", "secret1"),
                &LoginContext::default(),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(msg) if msg == "Credenciales incorrectas"));
    }

    #[test]
    fn test_login_response_synthesizes_session() {
        let response = LegacyAdapter
            .adapt_login_response(
                json!({"userId": 17, "mensaje": "ok"}),
                &LoginRequest::new("doc@h.com", "secret1"),
                &LoginContext {
                    issued_at: ISSUED,
                    professional_data: None,
                },
            )
            .unwrap();
        assert_eq!(response.user.id, "17");
        assert_eq!(response.user.email, "doc@h.com");
        assert!(validate_token_at(&response.access_token, ISSUED));
    }

    #[test]
    fn test_register_success_is_decided_by_response_field() {
        let (response, cache) = LegacyAdapter
            .adapt_register_response(json!({"response": "Registro Exitoso"}), &register_request("1"))
            .unwrap();
        assert_eq!(response.user.id, "0");
        assert_eq!(response.message, REGISTER_SUCCESS);
        assert!(cache.is_none());

        let (response, _) = LegacyAdapter
            .adapt_register_response(
                json!({"response": "Registro Exitoso", "id": 12}),
                &register_request("1"),
            )
            .unwrap();
        assert_eq!(response.user.email, "ana@h.com");

        for wire in [
            json!({"response": "Correo ya registrado"}),
            json!({"mensaje": "Registro Exitoso"}),
            json!({}),
        ] {
            assert!(matches!(
                LegacyAdapter.adapt_register_response(wire, &register_request("1")),
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_verify_email_path_encodes_email() {
        let call = LegacyAdapter.verify_email_call("a+b@h.com");
        assert_eq!(call.method, reqwest::Method::GET);
        assert_eq!(call.path, "/auth/verify-email/a%2Bb%40h.com");
        assert!(call.body.is_none());
    }
}
