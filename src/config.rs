/*
 * Responsibility
 * - Load settings from the environment (.env supported): bind port, strategy name,
 *   authentication options, HTTP limits
 * - Validate them (invalid values abort startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::middleware::auth::AuthOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    InvalidJson(&'static str, serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::InvalidJson(key, e) => write!(f, "invalid configuration: {}: {}", key, e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidJson(_, e) => Some(e),
            _ => None,
        }
    }
}

pub const DEFAULT_STRATEGY: &str = "demo-header";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth_strategy: String,
    pub auth_options: AuthOptions,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let auth_strategy =
            std::env::var("AUTH_STRATEGY").unwrap_or_else(|_| DEFAULT_STRATEGY.to_string());
        if auth_strategy.trim().is_empty() {
            return Err(ConfigError::Missing("AUTH_STRATEGY"));
        }

        let auth_options = parse_auth_options(std::env::var("AUTH_OPTIONS").ok().as_deref())?;

        let request_timeout_seconds = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?
            .unwrap_or(30);

        let request_body_limit_bytes = std::env::var("REQUEST_BODY_LIMIT_BYTES")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?
            .unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            auth_strategy,
            auth_options,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

/// `AUTH_OPTIONS` is a JSON object in the same camelCase shape as `AuthOptions`.
pub fn parse_auth_options(raw: Option<&str>) -> Result<AuthOptions, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(AuthOptions::default()),
        Some(raw) => {
            AuthOptions::from_json(raw).map_err(|e| ConfigError::InvalidJson("AUTH_OPTIONS", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::MessageOption;

    #[test]
    fn missing_auth_options_fall_back_to_defaults() {
        assert_eq!(parse_auth_options(None).unwrap(), AuthOptions::default());
        assert_eq!(parse_auth_options(Some("  ")).unwrap(), AuthOptions::default());
    }

    #[test]
    fn auth_options_from_json() {
        let options =
            parse_auth_options(Some(r#"{"failureRedirect":"/login","failureMessage":true}"#))
                .unwrap();
        assert_eq!(options.failure_redirect.as_deref(), Some("/login"));
        assert_eq!(options.failure_message, Some(MessageOption::Flag(true)));
    }

    #[test]
    fn malformed_auth_options_are_rejected() {
        let err = parse_auth_options(Some("{not json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson("AUTH_OPTIONS", _)));
        assert!(err.to_string().starts_with("invalid configuration: AUTH_OPTIONS"));
    }

    #[test]
    fn app_env_parsing() {
        assert!(AppEnv::parse("PROD").is_production());
        assert!(!AppEnv::parse("staging").is_production());
    }
}
