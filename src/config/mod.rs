use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Process-wide configuration, read once at startup and passed explicitly
/// through application state. Immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub security: SecurityConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_JWT_EXPIRY_HOURS: u64 = 24;
const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_GITHUB_TIMEOUT_SECS: u64 = 10;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT", DEFAULT_PORT)?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::InvalidVar("JWT_SECRET", "must not be empty".into()));
        }

        Ok(Self {
            port,
            database_url,
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            },
            github: GithubConfig {
                client_id: env::var("GITHUB_CLIENT_ID").ok(),
                client_secret: env::var("GITHUB_CLIENT_SECRET").ok(),
                api_base: env::var("GITHUB_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_GITHUB_API_BASE.to_string()),
                request_timeout_secs: parse_var("GITHUB_TIMEOUT_SECS", DEFAULT_GITHUB_TIMEOUT_SECS)?,
            },
        })
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar(name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        port: DEFAULT_PORT,
        database_url: "postgres://localhost/devconnect_test".into(),
        security: SecurityConfig {
            jwt_secret: "test-secret".into(),
            jwt_expiry_hours: DEFAULT_JWT_EXPIRY_HOURS,
        },
        github: GithubConfig {
            client_id: None,
            client_secret: None,
            api_base: DEFAULT_GITHUB_API_BASE.into(),
            request_timeout_secs: DEFAULT_GITHUB_TIMEOUT_SECS,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = test_config();
        assert_eq!(config.port, 5000);
        assert_eq!(config.security.jwt_expiry_hours, 24);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert!(config.github.request_timeout_secs > 0);
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        let v: u64 = parse_var("DEVCONNECT_NO_SUCH_VAR", 42).unwrap();
        assert_eq!(v, 42);
    }
}
