//! Email verification code entity.
//!
//! Codes are delivered to the user in plaintext but only their SHA-256 digest
//! is ever persisted.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Smallest code ever issued (codes never start with a zero)
pub const CODE_MIN: u32 = 100_000;

/// Largest code ever issued
pub const CODE_MAX: u32 = 999_999;

/// Default lifetime of a verification code (5 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// Which flow a verification code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPurpose {
    /// Account registration
    Register,
    /// Password change for an existing account
    ChangePassword,
}

impl VerificationPurpose {
    /// Stable string used in cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationPurpose::Register => "register",
            VerificationPurpose::ChangePassword => "change_password",
        }
    }
}

impl fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(VerificationPurpose::Register),
            "change_password" => Ok(VerificationPurpose::ChangePassword),
            _ => Err(format!("Invalid verification purpose: {}", s)),
        }
    }
}

/// Pending verification code for one (identity, purpose) key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Hex encoded SHA-256 digest of the code
    pub code_hash: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Number of failed verification attempts so far
    pub attempts: u32,
}

impl VerificationRecord {
    /// Creates a fresh record for `code`, valid for `ttl` from `now`
    pub fn issue(code: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code_hash: hash_code(code),
            created_at: now,
            expires_at: now + ttl,
            attempts: 0,
        }
    }

    /// Whether the record is past its expiry at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compares a submitted code against the stored digest in constant time
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(hash_code(submitted).as_bytes(), self.code_hash.as_bytes())
    }

    /// Remaining lifetime at `now`, never less than one second
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        let remaining = (self.expires_at - now).num_seconds().max(1);
        Duration::seconds(remaining)
    }

    /// Copy of this record with one more failed attempt counted
    pub fn with_failed_attempt(&self) -> Self {
        Self {
            attempts: self.attempts + 1,
            ..self.clone()
        }
    }
}

/// Generates a random six digit code using the OS CSPRNG
pub fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(CODE_MIN..=CODE_MAX);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// SHA-256 digest of a code, hex encoded
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Canonical form of an email identity
pub fn normalize_identity(identity: &str) -> String {
    identity.trim().to_lowercase()
}
