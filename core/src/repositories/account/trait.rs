//! Account repository trait defining the identity store.
//!
//! Identities are stored lower-cased; callers normalize before lookup.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Repository trait for Account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its normalized email identity
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with this identity
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Check if an account exists with the given identity
    async fn exists(&self, identity: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_identity(identity).await?.is_some())
    }

    /// Persist a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError::Auth(AccountAlreadyExists))` - Identity already taken
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Replace the secret hash of an account
    ///
    /// # Returns
    /// * `Ok(true)` - Secret updated
    /// * `Ok(false)` - Account not found
    async fn update_secret(&self, id: Uuid, secret_hash: &str) -> Result<bool, DomainError>;

    /// All accounts ordered by identity
    async fn list_all(&self) -> Result<Vec<Account>, DomainError>;

    /// Staff accounts, used as recipients of new reservation alerts
    async fn list_staff(&self) -> Result<Vec<Account>, DomainError>;
}
