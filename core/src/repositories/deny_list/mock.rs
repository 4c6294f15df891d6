//! In-memory implementation of DenyListRepository

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::deny_list::DenyListEntry;
use crate::errors::DomainError;

use super::r#trait::DenyListRepository;

#[derive(Clone, Default)]
pub struct MockDenyListRepository {
    entries: Arc<RwLock<HashMap<Uuid, DenyListEntry>>>,
}

impl MockDenyListRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DenyListRepository for MockDenyListRepository {
    async fn contains(&self, account_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.entries.read().await.contains_key(&account_id))
    }

    async fn add(&self, account_id: Uuid, reason: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&account_id) {
            return Ok(false);
        }
        entries.insert(
            account_id,
            DenyListEntry {
                account_id,
                reason: reason.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn remove(&self, account_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.remove(&account_id).is_some())
    }

    async fn list(&self) -> Result<Vec<DenyListEntry>, DomainError> {
        let mut entries: Vec<DenyListEntry> = self.entries.read().await.values().cloned().collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }
}
