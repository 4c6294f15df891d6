//! In-memory verification store

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::verification::VerificationRecord;

use super::traits::VerificationStore;

/// Verification store backed by a `HashMap` behind one async mutex
///
/// Entry TTLs are recorded but not enforced; the service checks
/// `expires_at` on every read.
#[derive(Clone, Default)]
pub struct MockVerificationStore {
    entries: Arc<Mutex<HashMap<String, (VerificationRecord, Duration)>>>,
}

impl MockVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL last applied to `key`
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().await.get(key).map(|(_, ttl)| *ttl)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl VerificationStore for MockVerificationStore {
    async fn insert_if_absent(
        &self,
        key: &str,
        record: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), (record.clone(), ttl));
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String> {
        Ok(self.entries.lock().await.get(key).map(|(r, _)| r.clone()))
    }

    async fn compare_and_update(
        &self,
        key: &str,
        expected: &VerificationRecord,
        updated: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if &entry.0 == expected => {
                *entry = (updated.clone(), ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn compare_and_delete(&self, key: &str, expected: &VerificationRecord) -> Result<bool, String> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((record, _)) if record == expected => {
                entries.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
