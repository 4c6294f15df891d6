//! Cache module for Redis-backed storage
//!
//! Provides the Redis client and the verification record store built on it.

pub mod redis_client;
pub mod verification_store;

pub use redis_client::RedisClient;
pub use verification_store::RedisVerificationStore;

// Re-export commonly used types
pub use cr_shared::config::CacheConfig;
