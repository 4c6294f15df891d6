//! Deny-list service: staff bans and unbans accounts

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::Principal;
use crate::errors::{AuthError, DenyListError, DomainError, DomainResult};
use crate::repositories::{AccountRepository, DenyListRepository};

/// Account fields exposed to staff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub identity: String,
    pub display_name: String,
    pub is_staff: bool,
}

impl From<Account> for AccountSummary {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            identity: a.identity,
            display_name: a.display_name,
            is_staff: a.is_staff,
        }
    }
}

/// All accounts split by deny-list membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountPartition {
    pub normal: Vec<AccountSummary>,
    pub denied: Vec<AccountSummary>,
}

pub struct DenyListService<A: ?Sized, D: ?Sized> {
    accounts: Arc<A>,
    deny_list: Arc<D>,
}

impl<A, D> DenyListService<A, D>
where
    A: AccountRepository + ?Sized,
    D: DenyListRepository + ?Sized,
{
    pub fn new(accounts: Arc<A>, deny_list: Arc<D>) -> Self {
        Self { accounts, deny_list }
    }

    /// Whether the caller is barred from booking
    pub async fn is_denied(&self, caller: &Principal) -> DomainResult<bool> {
        self.deny_list.contains(caller.account_id).await
    }

    /// Every account, partitioned into normal and denied
    pub async fn list_accounts(&self, caller: &Principal) -> DomainResult<AccountPartition> {
        require_staff(caller)?;

        let denied_ids: HashSet<Uuid> = self
            .deny_list
            .list()
            .await?
            .into_iter()
            .map(|e| e.account_id)
            .collect();

        let mut partition = AccountPartition::default();
        for account in self.accounts.list_all().await? {
            if denied_ids.contains(&account.id) {
                partition.denied.push(account.into());
            } else {
                partition.normal.push(account.into());
            }
        }
        Ok(partition)
    }

    /// Bar an account from booking
    pub async fn ban(&self, caller: &Principal, account_id: Uuid, reason: &str) -> DomainResult<()> {
        require_staff(caller)?;

        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(AuthError::AccountNotFound.into());
        }
        if !self.deny_list.add(account_id, reason.trim()).await? {
            return Err(DenyListError::AlreadyDenied.into());
        }

        tracing::info!(
            account_id = %account_id,
            staff_id = %caller.account_id,
            event = "account_denied",
            "Account added to deny-list"
        );
        Ok(())
    }

    /// Lift a ban; unbanning an account that is not listed succeeds
    pub async fn unban(&self, caller: &Principal, account_id: Uuid) -> DomainResult<()> {
        require_staff(caller)?;

        if self.deny_list.remove(account_id).await? {
            tracing::info!(
                account_id = %account_id,
                staff_id = %caller.account_id,
                event = "account_undenied",
                "Account removed from deny-list"
            );
        }
        Ok(())
    }
}

fn require_staff(caller: &Principal) -> DomainResult<()> {
    if caller.is_staff {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockAccountRepository, MockDenyListRepository};
    use chrono::Utc;

    fn account(identity: &str) -> Account {
        Account::new(identity.into(), "Name".into(), "hash".into(), Utc::now())
    }

    fn setup() -> (
        DenyListService<MockAccountRepository, MockDenyListRepository>,
        Principal,
        Account,
    ) {
        let staff = account("staff@email.ntou.edu.tw").as_staff();
        let user = account("user@email.ntou.edu.tw");
        let accounts = Arc::new(MockAccountRepository::with_accounts([staff.clone(), user.clone()]));
        let service = DenyListService::new(accounts, Arc::new(MockDenyListRepository::new()));
        (service, Principal::from(&staff), user)
    }

    #[tokio::test]
    async fn test_ban_and_partition() {
        let (service, staff, user) = setup();

        service.ban(&staff, user.id, "no-show").await.unwrap();
        assert!(service.is_denied(&Principal::from(&user)).await.unwrap());

        let partition = service.list_accounts(&staff).await.unwrap();
        assert_eq!(partition.denied.len(), 1);
        assert_eq!(partition.denied[0].id, user.id);
        assert_eq!(partition.normal.len(), 1);
    }

    #[tokio::test]
    async fn test_ban_twice_fails() {
        let (service, staff, user) = setup();
        service.ban(&staff, user.id, "").await.unwrap();
        let again = service.ban(&staff, user.id, "").await;
        assert!(matches!(again, Err(DomainError::DenyList(DenyListError::AlreadyDenied))));
    }

    #[tokio::test]
    async fn test_ban_unknown_account() {
        let (service, staff, _) = setup();
        let result = service.ban(&staff, Uuid::new_v4(), "").await;
        assert!(matches!(result, Err(DomainError::Auth(AuthError::AccountNotFound))));
    }

    #[tokio::test]
    async fn test_non_staff_forbidden() {
        let (service, _, user) = setup();
        let caller = Principal::from(&user);
        assert!(matches!(service.ban(&caller, user.id, "").await, Err(DomainError::Forbidden)));
        assert!(matches!(service.list_accounts(&caller).await, Err(DomainError::Forbidden)));
        assert!(matches!(service.unban(&caller, user.id).await, Err(DomainError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unban_is_idempotent() {
        let (service, staff, user) = setup();
        service.ban(&staff, user.id, "").await.unwrap();
        service.unban(&staff, user.id).await.unwrap();
        service.unban(&staff, user.id).await.unwrap();
        assert!(!service.is_denied(&Principal::from(&user)).await.unwrap());
    }
}
