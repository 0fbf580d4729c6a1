use std::env;

use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://api.sportmonks.com/v3/";
const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// API connection settings, resolved once from the environment.
/// Binaries load `.env` / `.env.local` via dotenvy before calling this.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token: String,
    pub base_url: String,
    pub timezone: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let token = env::var("SPORTMONKS_API_KEY")
            .context("SPORTMONKS_API_KEY is not set")?
            .trim()
            .to_string();
        if token.is_empty() {
            anyhow::bail!("SPORTMONKS_API_KEY is empty");
        }

        Ok(Self {
            token,
            base_url: env_or("SPORTMONKS_BASE_URL", DEFAULT_BASE_URL),
            timezone: env_or("SPORTMONKS_TIMEZONE", DEFAULT_TIMEZONE),
        })
    }

    /// Fixed config for tests and offline url assembly.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
        _ => default.to_string(),
    }
}
