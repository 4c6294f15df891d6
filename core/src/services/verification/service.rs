//! Main verification service implementation

use chrono::Duration;
use std::sync::Arc;

use cr_shared::utils::masking::mask_identity;

use crate::domain::entities::verification::{
    generate_code, normalize_identity, VerificationPurpose, VerificationRecord,
};
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::services::clock::Clock;
use crate::services::notification::MailServiceTrait;

use super::config::VerificationConfig;
use super::traits::VerificationStore;
use super::types::IssuedCode;
use super::validation;

/// Verification service for email verification codes
pub struct VerificationService<M: ?Sized, S: ?Sized> {
    /// Mail service used to deliver codes
    mail_service: Arc<M>,
    /// Store holding hashed codes
    store: Arc<S>,
    /// Time source for expiry math
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: VerificationConfig,
}

impl<M, S> VerificationService<M, S>
where
    M: MailServiceTrait + ?Sized,
    S: VerificationStore + ?Sized,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `mail_service` - Mail delivery implementation
    /// * `store` - Verification record store
    /// * `clock` - Time source
    /// * `config` - Service configuration
    pub fn new(
        mail_service: Arc<M>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            mail_service,
            store,
            clock,
            config,
        }
    }

    /// Service configuration
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Store key for an (identity, purpose) pair
    pub fn cache_key(&self, identity: &str, purpose: VerificationPurpose) -> String {
        format!(
            "{}:{}:{}",
            self.config.key_prefix,
            purpose.as_str(),
            normalize_identity(identity)
        )
    }

    /// Check that `identity` belongs to the configured email domain
    pub fn validate_identity(&self, identity: &str) -> Result<(), VerificationError> {
        validation::validate_identity(&self.config, identity)
    }

    /// Check password length and character mix
    pub fn validate_secret_strength(&self, secret: &str) -> Result<(), VerificationError> {
        validation::validate_secret_strength(&self.config, secret)
    }

    /// Issue a verification code and email it to `identity`
    ///
    /// This method:
    /// 1. Validates the identity format
    /// 2. Rejects the request while an unexpired code is outstanding
    /// 3. Generates and hashes a new code
    /// 4. Emails the plaintext code
    /// 5. Stores the hashed record with the configured TTL
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The code was delivered and stored
    /// * `Err(DomainError)` - `InvalidFormat`, `AlreadyIssued` or `DeliveryFailed`
    pub async fn request_code(
        &self,
        identity: &str,
        purpose: VerificationPurpose,
    ) -> DomainResult<IssuedCode> {
        self.validate_identity(identity)?;

        let identity = normalize_identity(identity);
        let key = self.cache_key(&identity, purpose);
        let now = self.clock.now();

        if let Some(existing) = self.store.get(&key).await.map_err(store_error)? {
            if !existing.is_expired(now) {
                let retry_after = existing.remaining_ttl(now).num_seconds();
                tracing::warn!(
                    identity = %mask_identity(&identity),
                    purpose = %purpose,
                    retry_after_seconds = retry_after,
                    event = "verification_throttled",
                    "Verification code already outstanding"
                );
                return Err(VerificationError::AlreadyIssued {
                    retry_after_seconds: retry_after,
                }
                .into());
            }
            // Stale record the store has not evicted yet
            self.store
                .compare_and_delete(&key, &existing)
                .await
                .map_err(store_error)?;
        }

        let code = generate_code();
        let ttl = Duration::seconds(self.config.ttl_seconds);
        let record = VerificationRecord::issue(&code, now, ttl);

        self.deliver(&identity, &code).await?;

        let stored = self
            .store
            .insert_if_absent(&key, &record, ttl)
            .await
            .map_err(store_error)?;
        if !stored {
            // A concurrent request won the slot; the code just mailed was never stored
            tracing::warn!(
                identity = %mask_identity(&identity),
                purpose = %purpose,
                event = "verification_race_lost",
                "Concurrent verification request already stored a code"
            );
            return Err(VerificationError::AlreadyIssued {
                retry_after_seconds: self.config.ttl_seconds,
            }
            .into());
        }

        tracing::info!(
            identity = %mask_identity(&identity),
            purpose = %purpose,
            expires_at = %record.expires_at,
            event = "verification_code_sent",
            "Verification code issued"
        );

        Ok(IssuedCode {
            identity,
            purpose,
            expires_at: record.expires_at,
        })
    }

    /// Check a submitted code
    ///
    /// A correct code consumes the record. A wrong code counts one attempt and
    /// keeps the record with its remaining TTL, until `max_attempts` is reached
    /// and the record is discarded.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code accepted
    /// * `Err(DomainError)` - `NotRequested`, `Expired`, `AttemptsExceeded` or `Mismatch`
    pub async fn verify_code(
        &self,
        identity: &str,
        purpose: VerificationPurpose,
        submitted: &str,
    ) -> DomainResult<()> {
        let identity = normalize_identity(identity);
        let key = self.cache_key(&identity, purpose);

        for _ in 0..self.config.max_store_retries {
            let record = match self.store.get(&key).await.map_err(store_error)? {
                Some(record) => record,
                None => return Err(VerificationError::NotRequested.into()),
            };
            let now = self.clock.now();

            if record.is_expired(now) {
                self.store
                    .compare_and_delete(&key, &record)
                    .await
                    .map_err(store_error)?;
                tracing::info!(
                    identity = %mask_identity(&identity),
                    purpose = %purpose,
                    event = "verification_expired",
                    "Verification code expired"
                );
                return Err(VerificationError::Expired.into());
            }

            if record.matches(submitted) {
                if self
                    .store
                    .compare_and_delete(&key, &record)
                    .await
                    .map_err(store_error)?
                {
                    tracing::info!(
                        identity = %mask_identity(&identity),
                        purpose = %purpose,
                        event = "verification_succeeded",
                        "Verification code accepted"
                    );
                    return Ok(());
                }
                continue;
            }

            let updated = record.with_failed_attempt();
            if updated.attempts >= self.config.max_attempts {
                if self
                    .store
                    .compare_and_delete(&key, &record)
                    .await
                    .map_err(store_error)?
                {
                    tracing::warn!(
                        identity = %mask_identity(&identity),
                        purpose = %purpose,
                        attempts = updated.attempts,
                        event = "verification_attempts_exceeded",
                        "Verification attempts exhausted"
                    );
                    return Err(VerificationError::AttemptsExceeded.into());
                }
                continue;
            }

            let remaining_ttl = record.remaining_ttl(now);
            if self
                .store
                .compare_and_update(&key, &record, &updated, remaining_ttl)
                .await
                .map_err(store_error)?
            {
                let remaining_attempts = self.config.max_attempts - updated.attempts;
                tracing::info!(
                    identity = %mask_identity(&identity),
                    purpose = %purpose,
                    attempts = updated.attempts,
                    event = "verification_mismatch",
                    "Verification code mismatch"
                );
                return Err(VerificationError::Mismatch { remaining_attempts }.into());
            }
        }

        tracing::error!(
            identity = %mask_identity(&identity),
            purpose = %purpose,
            "Verification store contention, giving up"
        );
        Err(DomainError::internal("verification record changed concurrently"))
    }

    async fn deliver(&self, identity: &str, code: &str) -> DomainResult<()> {
        let body = format!(
            "Your verification code is: {}\n\nThe code is valid for {} minutes. If you did not request it, ignore this email.\n",
            code,
            self.config.ttl_minutes()
        );
        let recipients = [identity.to_string()];

        match self
            .mail_service
            .send(&self.config.code_subject, &body, &recipients)
            .await
        {
            Ok(0) => {
                tracing::error!(
                    identity = %mask_identity(identity),
                    event = "verification_delivery_failed",
                    "Mail transport accepted no recipient"
                );
                Err(VerificationError::DeliveryFailed.into())
            }
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::error!(
                    identity = %mask_identity(identity),
                    error = %error,
                    event = "verification_delivery_failed",
                    "Failed to send verification email"
                );
                Err(VerificationError::DeliveryFailed.into())
            }
        }
    }
}

fn store_error(message: String) -> DomainError {
    DomainError::Internal {
        message: format!("Verification store error: {}", message),
    }
}
