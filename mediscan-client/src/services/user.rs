use tracing::{instrument, warn};

use super::gateway::GatewayClient;
use super::session_store::SessionStore;
use crate::config::users;
use crate::models::{UpdateProfileRequest, UserProfile};
use mediscan_core::AppError;

#[derive(Clone)]
pub struct UserService {
    gateway: GatewayClient,
    session: SessionStore,
}

impl UserService {
    pub fn new(gateway: GatewayClient, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    /// Fetch the profile and overwrite the cached copy.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile, AppError> {
        let profile: UserProfile = self.gateway.get(users::PROFILE).await?;
        self.session.cache_profile(&profile)?;
        Ok(profile)
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UserProfile, AppError> {
        request.check()?;

        let profile: UserProfile = self.gateway.put(users::PROFILE, request).await?;
        self.session.cache_profile(&profile)?;
        Ok(profile)
    }

    /// Like [`get_profile`](Self::get_profile) but serves the cached profile
    /// when the backend is unreachable, times out or fails server-side.
    pub async fn profile_or_cached(&self) -> Result<UserProfile, AppError> {
        match self.get_profile().await {
            Ok(profile) => Ok(profile),
            Err(AppError::Timeout(err)) | Err(AppError::Transport(err)) if err.is_unavailable() => {
                match self.session.cached_profile()? {
                    Some(cached) => {
                        warn!(status = err.status, code = %err.code, "Profile fetch failed, using cached profile");
                        Ok(cached)
                    }
                    None => Err(AppError::from(err)),
                }
            }
            Err(e) => Err(e),
        }
    }
}
