//! Authenticated caller identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::Account;

/// The account on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: Uuid,
    pub identity: String,
    pub is_staff: bool,
}

impl Principal {
    pub fn new(account_id: Uuid, identity: impl Into<String>, is_staff: bool) -> Self {
        Self {
            account_id,
            identity: identity.into(),
            is_staff,
        }
    }
}

impl From<&Account> for Principal {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            identity: account.identity.clone(),
            is_staff: account.is_staff,
        }
    }
}
