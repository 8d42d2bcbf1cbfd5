//! Opaque development tokens for backends that issue none.
//!
//! Format: `fake-{kind}-{subject}-{issuedAtMillis}-{nonce}.{base64(json)}`.
//! Validity is purely time based (one hour) and there is no signature, so a
//! token proves nothing about its holder. Only use against development
//! backends.

use base64::{engine::general_purpose, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

pub const TOKEN_PREFIX: &str = "fake-";
pub const TOKEN_LIFETIME_MS: i64 = 60 * 60 * 1000;
const NONCE_LEN: usize = 6;
const WARNING: &str = "This is a fake token for development only";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    #[serde(rename = "userId", default)]
    pub subject_id: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    /// Issue time in epoch millis.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub warning: String,
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn generate_token(kind: TokenKind, subject_id: &str) -> String {
    generate_token_at(kind, subject_id, now_millis())
}

pub fn generate_token_at(kind: TokenKind, subject_id: &str, issued_at: i64) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();

    let payload = TokenPayload {
        subject_id: subject_id.to_string(),
        kind,
        timestamp: issued_at,
        warning: WARNING.to_string(),
    };
    // Serializing a struct of strings and integers cannot fail.
    let json = serde_json::to_vec(&payload).unwrap_or_default();
    let encoded = general_purpose::STANDARD.encode(json);

    format!(
        "{}{}-{}-{}-{}.{}",
        TOKEN_PREFIX,
        kind.as_str(),
        subject_id.replace('.', "_"),
        issued_at,
        nonce,
        encoded
    )
}

pub fn validate_token(token: &str) -> bool {
    validate_token_at(token, now_millis())
}

pub fn validate_token_at(token: &str, now: i64) -> bool {
    parse_payload(token)
        .map(|payload| now.saturating_sub(payload.timestamp) < TOKEN_LIFETIME_MS)
        .unwrap_or(false)
}

pub fn decode_token(token: &str) -> Option<TokenPayload> {
    decode_token_at(token, now_millis())
}

pub fn decode_token_at(token: &str, now: i64) -> Option<TokenPayload> {
    let payload = parse_payload(token)?;
    if now.saturating_sub(payload.timestamp) < TOKEN_LIFETIME_MS {
        Some(payload)
    } else {
        None
    }
}

/// Structural checks shared by validation and decoding. Expiry is left to
/// the caller.
fn parse_payload(token: &str) -> Option<TokenPayload> {
    if token.is_empty() || !token.starts_with(TOKEN_PREFIX) {
        return None;
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return None;
    }

    let bytes = general_purpose::STANDARD.decode(parts[1]).ok()?;
    let payload: TokenPayload = serde_json::from_slice(&bytes).ok()?;

    if payload.subject_id.is_empty() || payload.timestamp <= 0 {
        return None;
    }
    Some(payload)
}
