use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    /// Load the bundled books and users at startup.
    #[serde(default = "default_seed")]
    pub seed: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { auth: AuthConfig::default(), seed: default_seed() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Signing key for bearer tokens. No token is issued when unset.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
        }
    }
}

fn default_seed() -> bool { true }
fn default_token_ttl_hours() -> i64 { 12 }
fn default_argon2_memory_kib() -> u32 { 19 * 1024 }
fn default_argon2_iterations() -> u32 { 2 }

impl AppConfig {
    /// Reads `SECRET_KEY`, `TOKEN_TTL_HOURS` and `SEED_DATA` on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = AppConfig::default();

        if let Some(secret) = lookup("SECRET_KEY").filter(|s| !s.is_empty()) {
            cfg.auth.jwt_secret = Some(secret);
        }

        if let Some(value) = lookup("TOKEN_TTL_HOURS") {
            cfg.auth.token_ttl_hours = value
                .trim()
                .parse()
                .ok()
                .filter(|hours: &i64| *hours > 0)
                .ok_or(ConfigError::InvalidVar { name: "TOKEN_TTL_HOURS", value })?;
        }

        if let Some(value) = lookup("SEED_DATA") {
            cfg.seed = match value.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => return Err(ConfigError::InvalidVar { name: "SEED_DATA", value }),
            };
        }

        Ok(cfg)
    }
}
