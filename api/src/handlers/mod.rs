//! Shared handler support

pub mod error;

pub use error::{domain_status, ApiError};
