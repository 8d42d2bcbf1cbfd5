#![allow(dead_code)]

use mediscan_client::models::{Session, UserProfile};
use mediscan_client::startup::build_client;
use mediscan_client::MediscanClient;
use mediscan_core::config::{BackendVariant, Settings};
use serde_json::{json, Value};

pub fn settings(base_url: &str, backend: BackendVariant) -> Settings {
    let mut settings = Settings::default();
    settings.api.base_url = base_url.to_string();
    settings.api.backend = backend;
    settings.api.timeout_ms = 2_000;
    settings
}

pub fn client(base_url: &str, backend: BackendVariant) -> MediscanClient {
    build_client(&settings(base_url, backend)).expect("client builds")
}

pub fn gateway_client(base_url: &str) -> MediscanClient {
    client(base_url, BackendVariant::Gateway)
}

pub fn profile_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Dr. Ana Torres",
        "email": "doc@h.com",
        "dni": "12345678",
        "specialty": "Radiology",
        "professionalId": "CMP-4411",
        "hospital": "Central",
        "phone": "+51 999 888 777",
        "createdAt": "2025-01-10T10:00:00Z",
        "updatedAt": "2025-01-10T10:00:00Z"
    })
}

/// Put the client into a signed-in state without going through login.
pub fn sign_in(client: &MediscanClient, access_token: &str) {
    let session = Session {
        access_token: access_token.to_string(),
        refresh_token: format!("{}-refresh", access_token),
        expires_in: 3600,
        issued_at: 1_736_500_000_000,
    };
    let profile: UserProfile = serde_json::from_value(profile_json("1")).expect("valid profile");
    client.session.save(&session, &profile).expect("session saved");
}
