//! Redis-backed verification record store.
//!
//! Records are stored as JSON under the key built by the verification
//! service. The compare operations run as Lua scripts so the check and the
//! write happen atomically on the server; equality is byte equality of the
//! serialized record.

use async_trait::async_trait;
use chrono::Duration;
use once_cell::sync::Lazy;
use redis::Script;

use cr_core::domain::entities::VerificationRecord;
use cr_core::services::VerificationStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

static COMPARE_AND_UPDATE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        if redis.call('GET', KEYS[1]) == ARGV[1] then
            redis.call('SET', KEYS[1], ARGV[2], 'EX', tonumber(ARGV[3]))
            return 1
        end
        return 0
        "#,
    )
});

static COMPARE_AND_DELETE: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        if redis.call('GET', KEYS[1]) == ARGV[1] then
            return redis.call('DEL', KEYS[1])
        end
        return 0
        "#,
    )
});

/// Verification store backed by Redis
#[derive(Clone)]
pub struct RedisVerificationStore {
    client: RedisClient,
}

impl RedisVerificationStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn encode(record: &VerificationRecord) -> Result<String, String> {
    serde_json::to_string(record).map_err(|e| format!("Failed to encode verification record: {}", e))
}

fn decode(raw: &str) -> Result<VerificationRecord, String> {
    serde_json::from_str(raw).map_err(|e| format!("Failed to decode verification record: {}", e))
}

fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.num_seconds().max(1) as u64
}

fn store_error(error: InfrastructureError) -> String {
    error.to_string()
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn insert_if_absent(
        &self,
        key: &str,
        record: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String> {
        let value = encode(record)?;
        self.client
            .set_nx_ex(key, &value, ttl_seconds(ttl))
            .await
            .map_err(store_error)
    }

    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String> {
        match self.client.get(key).await.map_err(store_error)? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn compare_and_update(
        &self,
        key: &str,
        expected: &VerificationRecord,
        updated: &VerificationRecord,
        ttl: Duration,
    ) -> Result<bool, String> {
        let args = [
            encode(expected)?,
            encode(updated)?,
            ttl_seconds(ttl).to_string(),
        ];
        let applied = self
            .client
            .run_script(&COMPARE_AND_UPDATE, key, &args)
            .await
            .map_err(store_error)?;
        Ok(applied == 1)
    }

    async fn compare_and_delete(&self, key: &str, expected: &VerificationRecord) -> Result<bool, String> {
        let args = [encode(expected)?];
        let deleted = self
            .client
            .run_script(&COMPARE_AND_DELETE, key, &args)
            .await
            .map_err(store_error)?;
        Ok(deleted == 1)
    }

    async fn delete(&self, key: &str) -> Result<(), String> {
        self.client.delete(key).await.map(|_| ()).map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> VerificationRecord {
        let now = Utc.with_ymd_and_hms(2025, 11, 20, 2, 0, 0).unwrap();
        VerificationRecord::issue("482913", now, Duration::seconds(300))
    }

    #[test]
    fn test_encoding_is_stable_across_decode() {
        let original = record().with_failed_attempt();
        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(encode(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_ttl_never_below_one_second() {
        assert_eq!(ttl_seconds(Duration::seconds(0)), 1);
        assert_eq!(ttl_seconds(Duration::milliseconds(400)), 1);
        assert_eq!(ttl_seconds(Duration::seconds(240)), 240);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode("not json").is_err());
    }
}
