//! Configuration module with infrastructure-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing configuration
//! - `cache` - Redis configuration for verification codes
//! - `database` - Database connection and pool configuration
//! - `environment` - Deployment mode and logging defaults
//! - `mail` - SMTP delivery configuration
//! - `server` - HTTP server and CORS configuration
//!
//! Business policy (verification TTL, reservation limits) lives next to the
//! services that enforce it in `cr_core`.

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod mail;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::MailConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Outgoing mail configuration
    pub mail: MailConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            mail: MailConfig::default(),
            jwt: JwtConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let logging = LoggingConfig::from_env(environment);

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            mail: MailConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_config_uses_development_logging() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}
