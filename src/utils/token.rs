use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static SESSION_CONFIG: OnceLock<crate::config::session::SessionConfig> = OnceLock::new();

/// Initialize session config from environment. Must be called once at startup.
pub fn init_session_config(config: crate::config::session::SessionConfig) -> Result<()> {
    SESSION_CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Session config already initialized"))?;
    Ok(())
}

fn get_config() -> &'static crate::config::session::SessionConfig {
    SESSION_CONFIG
        .get()
        .expect("Session config not initialized — call init_session_config() at startup")
}

/// Signed session state: exactly one role tag plus the row id of the
/// logged-in account in that role's table.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // row id in the role's table
    pub role: String, // "user", "volunteer" or "admin"
    pub exp: usize,
    pub iat: usize,
}

pub fn encode_session_token(id: i32, role: &str) -> Result<String> {
    let config = get_config();
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: id.to_string(),
        role: role.to_string(),
        exp: now + config.expiry_seconds as usize,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to encode session token: {}", e))
}

pub fn decode_session_token(token: &str) -> Result<Claims> {
    let config = get_config();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| anyhow::anyhow!("Failed to decode session token: {}", e))
}

pub fn session_expiry_seconds() -> u64 {
    get_config().expiry_seconds
}
