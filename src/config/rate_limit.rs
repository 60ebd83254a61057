use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

/// Two route classes: credential forms (register/login) and everything
/// behind a session.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub auth: RateLimitRule,
    pub gated: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth: RateLimitRule::new(5, 10),
            gated: RateLimitRule::new(20, 40),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(value) = env::var("RATE_LIMIT_ENABLED") {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => cfg.enabled = true,
                "0" | "false" | "no" | "off" => cfg.enabled = false,
                _ => {}
            }
        }

        if let Ok(raw) = env::var("RATE_LIMIT_AUTH") {
            match parse_rule(&raw) {
                Ok(rule) => cfg.auth = rule,
                Err(err) => tracing::warn!("Invalid RATE_LIMIT_AUTH '{}': {}", raw, err),
            }
        }

        if let Ok(raw) = env::var("RATE_LIMIT_GATED") {
            match parse_rule(&raw) {
                Ok(rule) => cfg.gated = rule,
                Err(err) => tracing::warn!("Invalid RATE_LIMIT_GATED '{}': {}", raw, err),
            }
        }

        cfg
    }
}

fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (per_second_raw, burst_raw) = raw
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("invalid rule '{}', expected per:burst", raw.trim()))?;

    let per_second: u64 = per_second_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid per_second '{}'", per_second_raw.trim()))?;
    let burst_size: u32 = burst_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid burst_size '{}'", burst_raw.trim()))?;

    if per_second == 0 {
        return Err("per_second must be > 0".to_string());
    }
    if burst_size == 0 {
        return Err("burst_size must be > 0".to_string());
    }

    Ok(RateLimitRule::new(per_second, burst_size))
}
