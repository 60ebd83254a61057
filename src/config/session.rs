use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub expiry_seconds: u64,
}

impl SessionConfig {
    pub fn from_env() -> Result<Self> {
        let secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable must be set"))?;

        if secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "SESSION_SECRET must be at least 32 characters"
            ));
        }

        let expiry_seconds = env::var("SESSION_EXPIRATION")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400); // 24 hours

        Ok(Self {
            secret,
            expiry_seconds,
        })
    }
}
