//! MySQL implementation of the DenyListRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use uuid::Uuid;

use cr_core::domain::entities::DenyListEntry;
use cr_core::errors::DomainError;
use cr_core::repositories::DenyListRepository;

use super::{column, query_error, uuid_column};

pub struct MySqlDenyListRepository {
    pool: MySqlPool,
}

impl MySqlDenyListRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DenyListRepository for MySqlDenyListRepository {
    async fn contains(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT 1 AS listed FROM deny_list WHERE account_id = ? LIMIT 1")
            .bind(account_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to check deny-list"))?;

        Ok(row.is_some())
    }

    async fn add(&self, account_id: Uuid, reason: &str) -> Result<bool, DomainError> {
        // INSERT IGNORE leaves an existing entry untouched and reports zero rows
        let result = sqlx::query(
            "INSERT IGNORE INTO deny_list (account_id, reason, created_at) VALUES (?, ?, ?)",
        )
        .bind(account_id.to_string())
        .bind(reason)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(query_error("Failed to add deny-list entry"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, account_id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM deny_list WHERE account_id = ?")
            .bind(account_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to remove deny-list entry"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<DenyListEntry>, DomainError> {
        let rows = sqlx::query(
            "SELECT account_id, reason, created_at FROM deny_list ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error("Failed to list deny-list"))?;

        rows.iter()
            .map(|row| {
                Ok(DenyListEntry {
                    account_id: uuid_column(row, "account_id")?,
                    reason: column(row, "reason")?,
                    created_at: column(row, "created_at")?,
                })
            })
            .collect()
    }
}
