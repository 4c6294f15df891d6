//! Account entity for email-verified users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: Uuid,

    /// Lower-cased email address used to sign in
    pub identity: String,

    /// Display name shown to staff
    pub display_name: String,

    /// Secret hash produced by the configured `SecretHasher`
    #[serde(skip_serializing)]
    pub secret_hash: String,

    /// Whether the account may review reservations and manage the deny-list
    pub is_staff: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new non-staff account
    pub fn new(identity: String, display_name: String, secret_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            display_name,
            secret_hash,
            is_staff: false,
            created_at: now,
        }
    }

    /// Builder used when seeding staff accounts
    pub fn as_staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}
