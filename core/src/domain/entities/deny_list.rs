//! Deny-list entry entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account barred from creating reservations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyListEntry {
    pub account_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
