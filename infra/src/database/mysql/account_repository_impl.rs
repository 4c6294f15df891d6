//! MySQL implementation of the AccountRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use cr_core::domain::entities::Account;
use cr_core::errors::{AuthError, DomainError};
use cr_core::repositories::AccountRepository;

use super::{column, is_duplicate_key, query_error, uuid_column};

const ACCOUNT_COLUMNS: &str = "id, identity, display_name, secret_hash, is_staff, created_at";

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &MySqlRow) -> Result<Account, DomainError> {
        Ok(Account {
            id: uuid_column(row, "id")?,
            identity: column(row, "identity")?,
            display_name: column(row, "display_name")?,
            secret_hash: column(row, "secret_hash")?,
            is_staff: column(row, "is_staff")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }

    async fn fetch_many(&self, query: &str) -> Result<Vec<Account>, DomainError> {
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to list accounts"))?;

        rows.iter().map(Self::row_to_account).collect()
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE identity = ? LIMIT 1", ACCOUNT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(identity)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find account by identity"))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts WHERE id = ? LIMIT 1", ACCOUNT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find account by id"))?;

        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (id, identity, display_name, secret_hash, is_staff, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.identity)
            .bind(&account.display_name)
            .bind(&account.secret_hash)
            .bind(account.is_staff)
            .bind(account.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(account),
            Err(e) if is_duplicate_key(&e) => Err(AuthError::AccountAlreadyExists.into()),
            Err(e) => Err(query_error("Failed to create account")(e)),
        }
    }

    async fn update_secret(&self, id: Uuid, secret_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE accounts SET secret_hash = ? WHERE id = ?")
            .bind(secret_hash)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to update account secret"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Account>, DomainError> {
        let query = format!("SELECT {} FROM accounts ORDER BY identity", ACCOUNT_COLUMNS);
        self.fetch_many(&query).await
    }

    async fn list_staff(&self) -> Result<Vec<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE is_staff = TRUE ORDER BY identity",
            ACCOUNT_COLUMNS
        );
        self.fetch_many(&query).await
    }
}
