//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::verification::VerificationPurpose;

/// Result of issuing a verification code; never carries the code itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedCode {
    /// Normalized identity the code was sent to
    pub identity: String,
    pub purpose: VerificationPurpose,
    pub expires_at: DateTime<Utc>,
}
