//! Shared error types and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details (field errors, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Error codes shared between the domain and the HTTP layer
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

    // Verification codes
    pub const INVALID_IDENTITY_FORMAT: &str = "INVALID_IDENTITY_FORMAT";
    pub const WEAK_SECRET: &str = "WEAK_SECRET";
    pub const CODE_ALREADY_ISSUED: &str = "CODE_ALREADY_ISSUED";
    pub const DELIVERY_FAILED: &str = "DELIVERY_FAILED";
    pub const CODE_NOT_REQUESTED: &str = "CODE_NOT_REQUESTED";
    pub const CODE_EXPIRED: &str = "CODE_EXPIRED";
    pub const ATTEMPTS_EXCEEDED: &str = "ATTEMPTS_EXCEEDED";
    pub const CODE_MISMATCH: &str = "CODE_MISMATCH";

    // Accounts
    pub const ACCOUNT_EXISTS: &str = "ACCOUNT_EXISTS";
    pub const ACCOUNT_NOT_FOUND: &str = "ACCOUNT_NOT_FOUND";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const ALREADY_DENIED: &str = "ALREADY_DENIED";

    // Reservations
    pub const BLACKLISTED: &str = "BLACKLISTED";
    pub const MISSING_FIELD: &str = "MISSING_FIELD";
    pub const FIELD_TOO_LONG: &str = "FIELD_TOO_LONG";
    pub const ROOM_NOT_FOUND: &str = "ROOM_NOT_FOUND";
    pub const INVALID_DATE: &str = "INVALID_DATE";
    pub const SLOT_CONFLICT: &str = "SLOT_CONFLICT";
    pub const RESERVATION_NOT_FOUND: &str = "RESERVATION_NOT_FOUND";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";

    // Room catalog
    pub const ROOM_CODE_TAKEN: &str = "ROOM_CODE_TAKEN";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

/// Result type with ErrorResponse as error
pub type ApiResult<T> = Result<T, ErrorResponse>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_details() {
        let response = ErrorResponse::new(error_codes::SLOT_CONFLICT, "taken")
            .add_detail("time_slot", "3-4");
        assert_eq!(response.error, "SLOT_CONFLICT");
        let details = response.details.unwrap();
        assert_eq!(details["time_slot"], serde_json::json!("3-4"));
    }
}
