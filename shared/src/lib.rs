//! Shared utilities and common types for the classroom reservation server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures and error codes
//! - Utility functions (identity masking for logs)
//! - API response envelope

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, MailConfig, ServerConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use types::ApiResponse;
pub use utils::masking::mask_identity;
