//! Trait for the verification record store

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::verification::VerificationRecord;

/// Keyed store of pending verification records
///
/// Every operation is atomic per key. The compare operations succeed only when
/// the stored record still equals `expected`, so two concurrent verifications
/// can never both consume a record or both count the same attempt.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Store `record` unless the key already holds one; returns whether it was stored
    async fn insert_if_absent(
        &self,
        key: &str,
        record: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String>;

    /// Fetch the record under `key`
    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String>;

    /// Replace `expected` with `updated`, resetting the entry expiry to `ttl`
    async fn compare_and_update(
        &self,
        key: &str,
        expected: &VerificationRecord,
        updated: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String>;

    /// Delete the record if it still equals `expected`
    async fn compare_and_delete(&self, key: &str, expected: &VerificationRecord) -> Result<bool, String>;

    /// Unconditionally delete the record
    async fn delete(&self, key: &str) -> Result<(), String>;
}
