//! JWT authentication configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens (HS256)
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 3600,
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("classroom-reservation"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: std::env::var("JWT_ACCESS_EXPIRY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.access_token_expiry),
            refresh_token_expiry: std::env::var("JWT_REFRESH_EXPIRY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_detection() {
        assert!(JwtConfig::default().is_using_default_secret());
        assert!(!JwtConfig::new("a-real-secret").is_using_default_secret());
    }

    #[test]
    fn test_expiry_in_minutes() {
        let config = JwtConfig::new("secret").with_access_expiry_minutes(30);
        assert_eq!(config.access_token_expiry, 1800);

        let config = JwtConfig::new("secret").with_refresh_expiry_days(2);
        assert_eq!(config.refresh_token_expiry, 172800);
    }
}
