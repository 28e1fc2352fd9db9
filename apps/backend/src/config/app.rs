use crate::error::AppError;
use crate::middleware::cors::parse_allowed_origins;
use crate::state::security_config::{CookieConfig, SecurityConfig};

use super::access::AccessPolicy;
use super::store::{must_var, StoreSettings};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Everything `main` needs to start serving.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub store: StoreSettings,
    pub cookie: CookieConfig,
    pub cors_origins: Vec<String>,
    pub access: AccessPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(&|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a
    /// named variable if it is set.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("PORT must be a valid port number, got '{raw}'")))?,
            _ => DEFAULT_PORT,
        };

        let secret = must_var(lookup, "ACCESS_TOKEN_SECRET")?;

        let secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| AppError::config(format!("COOKIE_SECURE must be true or false, got '{raw}'")))?,
            None => true,
        };

        let access = match lookup("GUARDED_RESOURCES") {
            Some(raw) => AccessPolicy::parse(&raw)?,
            None => AccessPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            security: SecurityConfig::new(secret.into_bytes()),
            store: StoreSettings::from_lookup(lookup)?,
            cookie: CookieConfig { secure },
            cors_origins: parse_allowed_origins(lookup("CORS_ALLOWED_ORIGINS").as_deref()),
            access,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
