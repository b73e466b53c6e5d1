// Centralized configuration for the phishscan backend.
// Every environment variable is read once at startup; the resulting
// AppConfig is shared read-only through AppState for the process lifetime.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // Redis cache (optional - scanning works without it, just slower)
    pub redis_url: Option<String>,

    // Upstream oracles
    pub ml_service_url: Option<String>,
    pub safe_browsing_api_key: Option<String>,

    // Security
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_seconds: u32,
    pub trust_proxy: bool,

    // Scan behavior
    pub scan_cache_ttl_seconds: u64,

    // Features
    pub disable_embedded_migrations: bool,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL".into()))?;

        let port = parse_env("PORT", 5000_u16)?;

        // CORS: localhost for development plus the deployed frontend origin
        let mut cors_allowed_origins = vec!["http://localhost:3000".to_string()];
        if let Ok(frontend) = env::var("FRONTEND_URL") {
            if !frontend.trim().is_empty() {
                cors_allowed_origins.push(frontend.trim().trim_end_matches('/').to_string());
            }
        }

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .into(),

            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            database_min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2)?,
            database_connect_timeout: parse_env("DATABASE_CONNECT_TIMEOUT", 10)?,
            database_idle_timeout: parse_env("DATABASE_IDLE_TIMEOUT", 300)?,
            database_max_lifetime: parse_env("DATABASE_MAX_LIFETIME", 1800)?,

            redis_url: env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty()),

            ml_service_url: env::var("ML_SERVICE_URL").ok().filter(|s| !s.trim().is_empty()),
            safe_browsing_api_key: env::var("SAFE_BROWSING_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            cors_allowed_origins,
            rate_limit_max_requests: parse_env("RATE_LIMIT_MAX_REQUESTS", 30)?,
            rate_limit_window_seconds: parse_env("RATE_LIMIT_WINDOW_SECONDS", 60)?,
            // Behind a reverse proxy the peer address is the proxy; opt in
            // to X-Forwarded-For so throttling keys on the real client
            trust_proxy: env::var("TRUST_PROXY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),

            scan_cache_ttl_seconds: parse_env("SCAN_CACHE_TTL_SECONDS", 3600)?,

            disable_embedded_migrations: env::var("DISABLE_EMBEDDED_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Full socket address for the HTTP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_without_optional_vars() {
        std::env::set_var("DATABASE_URL", "postgresql://localhost/phishscan");
        std::env::remove_var("REDIS_URL");
        std::env::remove_var("ML_SERVICE_URL");
        std::env::remove_var("SAFE_BROWSING_API_KEY");
        std::env::remove_var("FRONTEND_URL");
        std::env::remove_var("PORT");
        std::env::remove_var("TRUST_PROXY");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 5000);
        assert!(!config.trust_proxy);
        assert_eq!(config.rate_limit_max_requests, 30);
        assert_eq!(config.rate_limit_window_seconds, 60);
        assert_eq!(config.scan_cache_ttl_seconds, 3600);
        assert!(config.redis_url.is_none());
        assert!(config.safe_browsing_api_key.is_none());
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    #[serial]
    fn test_missing_database_url_is_an_error() {
        std::env::remove_var("DATABASE_URL");
        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_frontend_url_extends_cors_origins() {
        std::env::set_var("DATABASE_URL", "postgresql://localhost/phishscan");
        std::env::set_var("FRONTEND_URL", "https://phish-dashboard.example.com/");

        let config = AppConfig::from_env().unwrap();
        assert!(config
            .cors_allowed_origins
            .contains(&"https://phish-dashboard.example.com".to_string()));

        std::env::remove_var("FRONTEND_URL");
    }
}
