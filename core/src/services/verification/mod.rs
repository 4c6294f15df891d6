//! Verification service module for email-based codes
//!
//! This module provides the complete verification code workflow:
//! - identity and password policy validation
//! - code generation, hashing and emailing
//! - resend throttling while a code is outstanding
//! - attempt-limited verification with atomic store updates

mod config;
mod service;
mod store;
mod traits;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use store::MockVerificationStore;
pub use traits::VerificationStore;
pub use types::IssuedCode;
pub use validation::{validate_identity, validate_secret_strength};
