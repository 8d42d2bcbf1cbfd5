use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::gateway::GatewayClient;
use super::session_store::SessionStore;
use crate::adapters::{LoginContext, WireAdapter};
use crate::config::auth;
use crate::models::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest,
    ResetPasswordResponse, TokenPair, UserProfile, VerifyEmailResponse,
};
use crate::utils::token::now_millis;
use crate::utils::validation::require;
use mediscan_core::config::BackendVariant;
use mediscan_core::AppError;

pub const NO_ACCOUNT_MESSAGE: &str = "No account is associated with this email address";

/// Login, registration and session lifecycle over any backend variant.
#[derive(Clone)]
pub struct AuthService {
    gateway: GatewayClient,
    adapter: Arc<dyn WireAdapter>,
    session: SessionStore,
    trust_professional_cache: bool,
}

impl AuthService {
    pub fn new(
        gateway: GatewayClient,
        adapter: Arc<dyn WireAdapter>,
        session: SessionStore,
        trust_professional_cache: bool,
    ) -> Self {
        Self {
            gateway,
            adapter,
            session,
            trust_professional_cache,
        }
    }

    pub fn backend(&self) -> BackendVariant {
        self.adapter.variant()
    }

    /// Validate, authenticate and commit the session before returning.
    #[instrument(skip(self, request), fields(backend = ?self.adapter.variant()))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let wire = self
            .gateway
            .call(&self.adapter.login_call(request))
            .await
            .map_err(|e| rejection(e, AppError::AuthError))?;

        let professional_data = if self.trust_professional_cache {
            self.session.professional_data()?
        } else {
            None
        };
        let context = LoginContext {
            issued_at: now_millis(),
            professional_data,
        };

        let response = self
            .adapter
            .adapt_login_response(wire, request, &context)
            .map_err(|e| match e {
                AppError::AuthError(_) => e,
                other => AppError::AuthError(other.user_message()),
            })?;

        self.session
            .save(&response.session(context.issued_at), &response.user)?;

        info!(user_id = %response.user.id, "User logged in");
        Ok(response)
    }

    /// Create an account. The user is not signed in afterwards.
    #[instrument(skip(self, request), fields(backend = ?self.adapter.variant()))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, AppError> {
        request.check()?;

        let wire = self
            .gateway
            .call(&self.adapter.register_call(request))
            .await
            .map_err(|e| rejection(e, AppError::ValidationError))?;

        let (response, professional_data) =
            self.adapter.adapt_register_response(wire, request)?;

        if let Some(data) = professional_data {
            self.session.save_professional_data(&data)?;
        }

        info!(user_id = %response.user.id, "User registered");
        Ok(response)
    }

    #[instrument(skip(self))]
    pub async fn verify_email(&self, email: &str) -> Result<VerifyEmailResponse, AppError> {
        require(email, "Email is required")?;
        let email = email.trim();

        let wire = self
            .gateway
            .call(&self.adapter.verify_email_call(email))
            .await?;
        self.adapter.adapt_verify_email_response(wire, email)
    }

    #[instrument(skip(self, request), fields(backend = ?self.adapter.variant()))]
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ResetPasswordResponse, AppError> {
        if !self.adapter.capabilities().reset_password {
            return Err(AppError::NotImplemented(
                "Password reset is not available for this backend".to_string(),
            ));
        }
        request.validate()?;

        let body = json!({
            "email": request.email,
            "newPassword": request.new_password,
        });
        let wire = match self
            .gateway
            .request(Method::POST, auth::RESET_PASSWORD, Some(&body))
            .await
        {
            Ok(wire) => wire,
            Err(AppError::Transport(err))
                if err.status == 404 && self.backend() == BackendVariant::Legacy =>
            {
                return Ok(ResetPasswordResponse {
                    success: false,
                    message: NO_ACCOUNT_MESSAGE.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        Ok(ResetPasswordResponse {
            success: wire.get("success").and_then(Value::as_bool).unwrap_or(false),
            message: wire
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Password updated successfully")
                .to_string(),
        })
    }

    /// Best-effort remote logout. Local session state is always cleared.
    #[instrument(skip(self), fields(backend = ?self.adapter.variant()))]
    pub async fn logout(&self) -> Result<(), AppError> {
        if self.adapter.capabilities().remote_logout {
            if let Err(e) = self.gateway.request(Method::POST, auth::LOGOUT, None).await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        self.session.clear()?;
        info!("User logged out");
        Ok(())
    }

    #[instrument(skip(self), fields(backend = ?self.adapter.variant()))]
    pub async fn refresh_token(&self) -> Result<TokenPair, AppError> {
        let refresh_token = self
            .session
            .refresh_token()?
            .ok_or_else(|| AppError::AuthError("No refresh token available".to_string()))?;

        if !self.adapter.capabilities().refresh_token {
            return Err(AppError::NotImplemented(
                "Token refresh is not available for this backend".to_string(),
            ));
        }

        let pair: TokenPair = self
            .gateway
            .post(auth::REFRESH_TOKEN, &json!({ "refreshToken": refresh_token }))
            .await
            .map_err(|e| rejection(e, AppError::AuthError))?;

        self.session.update_tokens(&pair)?;
        Ok(pair)
    }

    pub fn current_user(&self) -> Result<Option<UserProfile>, AppError> {
        self.session.cached_profile()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Backend 4xx answers become the given client-facing error, keeping the
/// backend message.
fn rejection(err: AppError, into: fn(String) -> AppError) -> AppError {
    match err {
        AppError::Transport(api) if (400..500).contains(&api.status) => into(api.message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediscan_core::ApiError;

    #[test]
    fn test_rejection_maps_client_errors_only() {
        let err = rejection(
            AppError::Transport(ApiError::new("Bad credentials", "AUTH", 401)),
            AppError::AuthError,
        );
        assert!(matches!(err, AppError::AuthError(msg) if msg == "Bad credentials"));

        let err = rejection(
            AppError::Transport(ApiError::new("boom", "X", 502)),
            AppError::AuthError,
        );
        assert!(matches!(err, AppError::Transport(_)));

        let err = rejection(AppError::Timeout(ApiError::timeout()), AppError::ValidationError);
        assert!(matches!(err, AppError::Timeout(_)));
    }
}
