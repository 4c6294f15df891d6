//! # Infrastructure Layer
//!
//! Concrete implementations of the seams declared in `cr_core`:
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis client and the verification record store
//! - **Mail**: SMTP delivery through lettre, plus a console transport for development
//! - **Security**: bcrypt password hashing

use std::sync::Arc;

use cr_core::services::MailServiceTrait;
use cr_shared::config::AppConfig;

// Re-export core types for convenience
pub use cr_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and verification store
pub mod cache;

/// Mail module - outgoing email transports
pub mod mail;

/// Security module - password hashing
pub mod security;

use cache::{RedisClient, RedisVerificationStore};
use database::{
    DatabasePool, MySqlAccountRepository, MySqlDenyListRepository, MySqlReservationRepository,
    MySqlRoomCatalog,
};
use security::BcryptSecretHasher;

/// Infrastructure service container
///
/// Holds one shared instance of every adapter; the API layer wires them into
/// the core services.
#[derive(Clone)]
pub struct InfrastructureServices {
    pub database: DatabasePool,
    pub redis: RedisClient,
    pub accounts: Arc<MySqlAccountRepository>,
    pub deny_list: Arc<MySqlDenyListRepository>,
    pub rooms: Arc<MySqlRoomCatalog>,
    pub reservations: Arc<MySqlReservationRepository>,
    pub verification_store: Arc<RedisVerificationStore>,
    pub mail: Arc<dyn MailServiceTrait>,
    pub hasher: Arc<BcryptSecretHasher>,
}

/// Initialize infrastructure services
///
/// This function sets up:
/// - The MySQL connection pool, running migrations when configured
/// - The Redis connection
/// - The mail transport selected by `mail.provider`
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services");

    let database = DatabasePool::new(config.database.clone()).await?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }

    let redis = RedisClient::new(config.cache.clone()).await?;
    let mail = mail::create_mail_service(&config.mail)?;

    let pool = database.get_pool().clone();
    let services = InfrastructureServices {
        accounts: Arc::new(MySqlAccountRepository::new(pool.clone())),
        deny_list: Arc::new(MySqlDenyListRepository::new(pool.clone())),
        rooms: Arc::new(MySqlRoomCatalog::new(pool.clone())),
        reservations: Arc::new(MySqlReservationRepository::new(pool)),
        verification_store: Arc::new(RedisVerificationStore::new(redis.clone())),
        mail,
        hasher: Arc::new(BcryptSecretHasher::default()),
        database,
        redis,
    };

    tracing::info!("Infrastructure services initialized successfully");
    Ok(services)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Mail transport error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}
