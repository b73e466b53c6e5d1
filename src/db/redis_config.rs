use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Redis connection configuration.
/// Redis is optional for this service: when REDIS_URL is absent the
/// cache and rate limiter run in degraded (always-miss / open) mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub redis_url: String,
    pub connection_timeout: Duration,
    pub command_timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
}

impl RedisConfig {
    /// Create configuration from environment variables.
    /// Returns None when no REDIS_URL is configured.
    pub fn from_env() -> Option<Self> {
        let redis_url = std::env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty())?;
        Some(Self::for_url(redis_url))
    }

    pub fn for_url(redis_url: String) -> Self {
        Self {
            redis_url,
            connection_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECTION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            command_timeout: Duration::from_secs(
                std::env::var("REDIS_COMMAND_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            retry_attempts: std::env::var("REDIS_RETRY_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            retry_delay: Duration::from_millis(
                std::env::var("REDIS_RETRY_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(100),
            ),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.redis_url.is_empty() {
            return Err("Redis URL cannot be empty".to_string());
        }
        if self.connection_timeout.as_secs() == 0 {
            return Err("Connection timeout must be greater than 0".to_string());
        }
        if self.command_timeout.as_secs() == 0 {
            return Err("Command timeout must be greater than 0".to_string());
        }
        if self.retry_attempts == 0 {
            return Err("Retry attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = RedisConfig::for_url("redis://localhost:6379".to_string());
        assert!(config.validate().is_ok());

        config.redis_url = String::new();
        assert!(config.validate().is_err());
        config.redis_url = "redis://localhost:6379".to_string();

        config.retry_attempts = 0;
        assert!(config.validate().is_err());
    }
}
