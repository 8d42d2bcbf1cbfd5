//! Durable session state: tokens, the cached profile and the professional
//! data side-cache.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::{KeyValueStorage, MemoryStorage, StorageError};
use crate::models::{ProfessionalData, Session, TokenPair, UserProfile};
use crate::utils::token::now_millis;
use mediscan_core::AppError;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_PROFILE_KEY: &str = "userProfile";
pub const PROFESSIONAL_DATA_KEY: &str = "professionalData";
pub const LOGIN_TIMESTAMP_KEY: &str = "loginTimestamp";
pub const USER_ID_KEY: &str = "userId";
pub const EXPIRES_IN_KEY: &str = "expiresIn";

const SESSION_KEYS: [&str; 7] = [
    ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
    USER_PROFILE_KEY,
    PROFESSIONAL_DATA_KEY,
    LOGIN_TIMESTAMP_KEY,
    USER_ID_KEY,
    EXPIRES_IN_KEY,
];

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist a fresh login in one write.
    pub fn save(&self, session: &Session, profile: &UserProfile) -> Result<(), AppError> {
        let profile_json = serde_json::to_string(profile).map_err(StorageError::from)?;

        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, session.access_token.clone()),
            (REFRESH_TOKEN_KEY, session.refresh_token.clone()),
            (EXPIRES_IN_KEY, session.expires_in.to_string()),
            (LOGIN_TIMESTAMP_KEY, session.issued_at.to_string()),
            (USER_ID_KEY, profile.id.clone()),
            (USER_PROFILE_KEY, profile_json),
        ])?;

        debug!(user_id = %profile.id, "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AppError> {
        self.storage.remove_many(&SESSION_KEYS)?;
        debug!("Session cleared");
        Ok(())
    }

    /// Presence check only; expiry is not considered.
    pub fn is_authenticated(&self) -> bool {
        match self.access_token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read access token");
                false
            }
        }
    }

    /// True once `loginTimestamp + expiresIn` has passed. A session without
    /// a readable timestamp counts as expired.
    pub fn is_expired_at(&self, now: i64) -> Result<bool, AppError> {
        match self.current_session()? {
            Some(session) if session.issued_at > 0 => Ok(now >= session.expires_at_millis()),
            _ => Ok(true),
        }
    }

    pub fn is_expired(&self) -> Result<bool, AppError> {
        self.is_expired_at(now_millis())
    }

    pub fn access_token(&self) -> Result<Option<String>, AppError> {
        self.non_empty(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>, AppError> {
        self.non_empty(REFRESH_TOKEN_KEY)
    }

    pub fn user_id(&self) -> Result<Option<String>, AppError> {
        self.non_empty(USER_ID_KEY)
    }

    pub fn update_tokens(&self, pair: &TokenPair) -> Result<(), AppError> {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, pair.access_token.clone()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.clone()),
            (LOGIN_TIMESTAMP_KEY, now_millis().to_string()),
        ])?;
        Ok(())
    }

    pub fn current_session(&self) -> Result<Option<Session>, AppError> {
        let access_token = match self.access_token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        Ok(Some(Session {
            access_token,
            refresh_token: self.refresh_token()?.unwrap_or_default(),
            expires_in: self.parsed(EXPIRES_IN_KEY)?.unwrap_or(0),
            issued_at: self.parsed(LOGIN_TIMESTAMP_KEY)?.unwrap_or(0),
        }))
    }

    pub fn cached_profile(&self) -> Result<Option<UserProfile>, AppError> {
        self.json(USER_PROFILE_KEY)
    }

    pub fn cache_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let json = serde_json::to_string(profile).map_err(StorageError::from)?;
        self.storage.set_many(&[
            (USER_PROFILE_KEY, json),
            (USER_ID_KEY, profile.id.clone()),
        ])?;
        Ok(())
    }

    pub fn professional_data(&self) -> Result<Option<ProfessionalData>, AppError> {
        self.json(PROFESSIONAL_DATA_KEY)
    }

    pub fn save_professional_data(&self, data: &ProfessionalData) -> Result<(), AppError> {
        let json = serde_json::to_string(data).map_err(StorageError::from)?;
        self.storage.set(PROFESSIONAL_DATA_KEY, json)?;
        Ok(())
    }

    fn non_empty(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.storage.get(key)?.filter(|v| !v.is_empty()))
    }

    fn parsed(&self, key: &str) -> Result<Option<i64>, AppError> {
        Ok(self.storage.get(key)?.and_then(|v| v.parse().ok()))
    }

    /// Unreadable cached JSON is treated as absent rather than fatal.
    fn json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let raw = match self.storage.get(key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cached value");
                Ok(None)
            }
        }
    }
}
