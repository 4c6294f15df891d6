//! Configuration for the verification service

use crate::domain::entities::verification::{DEFAULT_TTL_SECONDS, MAX_ATTEMPTS};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Seconds before a verification code expires
    pub ttl_seconds: i64,
    /// Failed attempts after which the code is discarded
    pub max_attempts: u32,
    /// Namespace of verification records in the store
    pub key_prefix: String,
    /// Domain every identity must belong to
    pub email_domain: String,
    /// Minimum password length
    pub secret_min_len: usize,
    /// Maximum password length
    pub secret_max_len: usize,
    /// Subject line of the code email
    pub code_subject: String,
    /// Read-decide-write rounds before giving up on a contended key
    pub max_store_retries: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_attempts: MAX_ATTEMPTS,
            key_prefix: "email_verification".to_string(),
            email_domain: "email.ntou.edu.tw".to_string(),
            secret_min_len: 8,
            secret_max_len: 15,
            code_subject: "[Classroom] Email verification code".to_string(),
            max_store_retries: 5,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: env_parse("VERIFICATION_TTL_SECONDS").unwrap_or(defaults.ttl_seconds),
            max_attempts: env_parse("VERIFICATION_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            key_prefix: std::env::var("VERIFICATION_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            email_domain: std::env::var("VERIFICATION_EMAIL_DOMAIN").unwrap_or(defaults.email_domain),
            ..defaults
        }
    }

    /// TTL in whole minutes, rounded up, for user-facing text
    pub fn ttl_minutes(&self) -> i64 {
        (self.ttl_seconds + 59) / 60
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
