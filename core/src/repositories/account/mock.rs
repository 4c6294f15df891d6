//! In-memory implementation of AccountRepository for testing and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::{AuthError, DomainError};

use super::r#trait::AccountRepository;

/// Mock account repository backed by a `HashMap`
#[derive(Clone, Default)]
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `accounts`
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let map = accounts.into_iter().map(|a| (a.id, a)).collect();
        Self {
            accounts: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.identity == identity).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.identity == account.identity) {
            return Err(AuthError::AccountAlreadyExists.into());
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_secret(&self, id: Uuid, secret_hash: &str) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&id) {
            Some(account) => {
                account.secret_hash = secret_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(all)
    }

    async fn list_staff(&self) -> Result<Vec<Account>, DomainError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|a| a.is_staff)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(identity: &str) -> Account {
        Account::new(identity.to_string(), "Name".to_string(), "hash".to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_identity() {
        let repo = MockAccountRepository::new();
        repo.create(account("a@email.ntou.edu.tw")).await.unwrap();

        let result = repo.create(account("a@email.ntou.edu.tw")).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::AccountAlreadyExists))
        ));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_staff_filters() {
        let repo = MockAccountRepository::with_accounts([
            account("a@email.ntou.edu.tw"),
            account("staff@email.ntou.edu.tw").as_staff(),
        ]);
        let staff = repo.list_staff().await.unwrap();
        assert_eq!(staff.len(), 1);
        assert_eq!(staff[0].identity, "staff@email.ntou.edu.tw");
    }

    #[tokio::test]
    async fn test_update_secret_unknown_account() {
        let repo = MockAccountRepository::new();
        assert!(!repo.update_secret(Uuid::new_v4(), "x").await.unwrap());
    }
}
