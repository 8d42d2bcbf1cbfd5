use serde_json::{json, Value};

use super::{invalid_response, str_field, Capabilities, LoginContext, WireAdapter, WireCall};
use crate::config::auth;
use crate::models::{
    LoginRequest, LoginResponse, ProfessionalData, RegisterRequest, RegisterResponse,
    VerifyEmailResponse,
};
use mediscan_core::config::BackendVariant;
use mediscan_core::AppError;

/// Canonical camelCase contract. Requests pass through almost untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayAdapter;

impl WireAdapter for GatewayAdapter {
    fn variant(&self) -> BackendVariant {
        BackendVariant::Gateway
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            reset_password: true,
            refresh_token: true,
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
        let mut body = json!({
            "email": request.email,
            "password": request.password,
        });
        if let Some(remember_me) = request.remember_me {
            body["rememberMe"] = Value::Bool(remember_me);
        }
        body
    }

    fn adapt_login_response(
        &self,
        wire: Value,
        _request: &LoginRequest,
        _context: &LoginContext,
    ) -> Result<LoginResponse, AppError> {
        if str_field(&wire, "accessToken").is_none() {
            return Err(AppError::AuthError(
                str_field(&wire, "message").unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }

        serde_json::from_value(wire.clone())
            .map_err(|e| invalid_response(format!("Malformed login response: {}", e), wire))
    }

    fn adapt_register_request(&self, request: &RegisterRequest) -> Value {
        json!({
            "name": request.name,
            "email": request.email,
            "password": request.password,
            "dni": request.dni,
            "specialty": request.specialty,
            "professionalId": request.professional_id,
            "hospital": request.hospital,
            "phone": request.phone,
        })
    }

    fn adapt_register_response(
        &self,
        wire: Value,
        _request: &RegisterRequest,
    ) -> Result<(RegisterResponse, Option<ProfessionalData>), AppError> {
        let response = serde_json::from_value(wire.clone())
            .map_err(|e| invalid_response(format!("Malformed register response: {}", e), wire))?;
        Ok((response, None))
    }

    fn verify_email_call(&self, email: &str) -> WireCall {
        WireCall::post(auth::VERIFY_EMAIL, json!({ "email": email }))
    }

    fn adapt_verify_email_response(
        &self,
        wire: Value,
        email: &str,
    ) -> Result<VerifyEmailResponse, AppError> {
        match wire.get("exists").and_then(Value::as_bool) {
            Some(exists) => Ok(VerifyEmailResponse {
                exists,
                email: str_field(&wire, "email").unwrap_or_else(|| email.to_string()),
            }),
            None => Err(invalid_response(
                "Email check response is missing `exists`",
                wire,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_includes_remember_me_only_when_set() {
        let mut request = LoginRequest::new("doc@h.com", "secret1");
        assert_eq!(
            GatewayAdapter.adapt_login_request(&request),
            json!({"email": "doc@h.com", "password": "secret1"})
        );

        request.remember_me = Some(true);
        assert_eq!(
            GatewayAdapter.adapt_login_request(&request)["rememberMe"],
            json!(true)
        );
    }

    #[test]
    fn test_login_response_passes_through() {
        let wire = json!({
            "user": {"id": "u1", "name": "Doc", "email": "doc@h.com"},
            "accessToken": "at",
            "refreshToken": "rt",
            "expiresIn": 900
        });
        let response = GatewayAdapter
            .adapt_login_response(
                wire,
                &LoginRequest::new("doc@h.com", "secret1"),
                &LoginContext::default(),
            )
            .unwrap();
        assert_eq!(response.user.id, "u1");
        assert_eq!(response.access_token, "at");
        assert_eq!(response.expires_in, 900);
    }

    #[test]
    fn test_login_response_without_token_is_auth_error() {
        let err = GatewayAdapter
            .adapt_login_response(
                json!({"message": "Invalid password"}),
                &LoginRequest::new("doc@h.com", "secret1"),
                &LoginContext::default(),
            )
            .unwrap_err();
        match err {
            AppError::AuthError(msg) => assert_eq!(msg, "Invalid password"),
            other => panic!("Expected AuthError, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_email_reads_exists() {
        let call = GatewayAdapter.verify_email_call("a@h.com");
        assert_eq!(call.path, "/auth/verify-email");
        assert_eq!(call.body, Some(json!({"email": "a@h.com"})));

        let response = GatewayAdapter
            .adapt_verify_email_response(json!({"exists": true}), "a@h.com")
            .unwrap();
        assert!(response.exists);
        assert_eq!(response.email, "a@h.com");
    }
}
