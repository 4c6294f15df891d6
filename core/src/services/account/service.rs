//! Account service implementation

use std::sync::Arc;

use cr_shared::utils::masking::mask_identity;

use crate::domain::entities::account::Account;
use crate::domain::entities::verification::{normalize_identity, VerificationPurpose};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::AccountRepository;
use crate::services::clock::Clock;
use crate::services::notification::MailServiceTrait;
use crate::services::verification::{IssuedCode, VerificationService, VerificationStore};

use super::hasher::SecretHasher;

/// Account lifecycle built on email verification codes
pub struct AccountService<A: ?Sized, H: ?Sized, M: ?Sized, S: ?Sized> {
    accounts: Arc<A>,
    hasher: Arc<H>,
    verification: Arc<VerificationService<M, S>>,
    clock: Arc<dyn Clock>,
}

impl<A, H, M, S> AccountService<A, H, M, S>
where
    A: AccountRepository + ?Sized,
    H: SecretHasher + ?Sized,
    M: MailServiceTrait + ?Sized,
    S: VerificationStore + ?Sized,
{
    pub fn new(
        accounts: Arc<A>,
        hasher: Arc<H>,
        verification: Arc<VerificationService<M, S>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            verification,
            clock,
        }
    }

    /// Email a registration code to an identity that is not yet registered
    pub async fn send_register_code(&self, identity: &str) -> DomainResult<IssuedCode> {
        self.verification.validate_identity(identity)?;
        let identity = normalize_identity(identity);

        if self.accounts.exists(&identity).await? {
            return Err(AuthError::AccountAlreadyExists.into());
        }

        self.verification
            .request_code(&identity, VerificationPurpose::Register)
            .await
    }

    /// Create an account after checking the registration code
    ///
    /// Identity format, password strength and uniqueness are checked before
    /// the code, so a malformed request does not burn a verification attempt.
    pub async fn register(
        &self,
        identity: &str,
        display_name: &str,
        secret: &str,
        code: &str,
    ) -> DomainResult<Account> {
        self.verification.validate_identity(identity)?;
        self.verification.validate_secret_strength(secret)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::Validation {
                message: "name is required".to_string(),
            });
        }

        let identity = normalize_identity(identity);
        if self.accounts.exists(&identity).await? {
            return Err(AuthError::AccountAlreadyExists.into());
        }

        self.verification
            .verify_code(&identity, VerificationPurpose::Register, code)
            .await?;

        let secret_hash = self.hash(secret)?;
        let account = Account::new(
            identity,
            display_name.to_string(),
            secret_hash,
            self.clock.now(),
        );
        let account = self.accounts.create(account).await?;

        tracing::info!(
            account_id = %account.id,
            identity = %mask_identity(&account.identity),
            event = "account_registered",
            "Account registered"
        );
        Ok(account)
    }

    /// Email a password change code to an existing account
    pub async fn send_change_secret_code(&self, identity: &str) -> DomainResult<IssuedCode> {
        self.verification.validate_identity(identity)?;
        let identity = normalize_identity(identity);

        if !self.accounts.exists(&identity).await? {
            return Err(AuthError::AccountNotFound.into());
        }

        self.verification
            .request_code(&identity, VerificationPurpose::ChangePassword)
            .await
    }

    /// Set a new password after checking the change code
    pub async fn change_secret(&self, identity: &str, new_secret: &str, code: &str) -> DomainResult<()> {
        self.verification.validate_identity(identity)?;
        self.verification.validate_secret_strength(new_secret)?;
        let identity = normalize_identity(identity);

        let account = self
            .accounts
            .find_by_identity(&identity)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        self.verification
            .verify_code(&identity, VerificationPurpose::ChangePassword, code)
            .await?;

        let secret_hash = self.hash(new_secret)?;
        if !self.accounts.update_secret(account.id, &secret_hash).await? {
            return Err(AuthError::AccountNotFound.into());
        }

        tracing::info!(
            account_id = %account.id,
            event = "account_secret_changed",
            "Password changed"
        );
        Ok(())
    }

    /// Check sign-in credentials
    ///
    /// Unknown identities and wrong passwords fail identically.
    pub async fn authenticate(&self, identity: &str, secret: &str) -> DomainResult<Account> {
        let identity = normalize_identity(identity);
        let account = match self.accounts.find_by_identity(&identity).await? {
            Some(account) => account,
            None => {
                tracing::info!(identity = %mask_identity(&identity), "Sign-in for unknown identity");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let valid = self
            .hasher
            .verify(secret, &account.secret_hash)
            .map_err(|e| DomainError::internal(format!("Secret verification failed: {}", e)))?;
        if !valid {
            tracing::info!(account_id = %account.id, "Sign-in with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(account)
    }

    /// Look up an account by id
    pub async fn find_by_id(&self, id: uuid::Uuid) -> DomainResult<Option<Account>> {
        self.accounts.find_by_id(id).await
    }

    fn hash(&self, secret: &str) -> DomainResult<String> {
        self.hasher
            .hash(secret)
            .map_err(|e| DomainError::internal(format!("Secret hashing failed: {}", e)))
    }
}
