//! Deny-list store: accounts barred from booking.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::deny_list::DenyListEntry;
use crate::errors::DomainError;

#[async_trait]
pub trait DenyListRepository: Send + Sync {
    /// Membership check
    async fn contains(&self, account_id: Uuid) -> Result<bool, DomainError>;

    /// Add an account; returns `false` when it was already listed
    async fn add(&self, account_id: Uuid, reason: &str) -> Result<bool, DomainError>;

    /// Remove an account; returns `false` when it was not listed
    async fn remove(&self, account_id: Uuid) -> Result<bool, DomainError>;

    /// All entries
    async fn list(&self) -> Result<Vec<DenyListEntry>, DomainError>;
}
