//! Domain-specific error types for verification, accounts and reservations
//!
//! Each enum groups the failures of one subsystem. Variants are kept distinct so
//! a client can react differently to validation, policy, not-found and
//! forbidden failures.

use thiserror::Error;

/// Verification code errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid email format: {identity}")]
    InvalidFormat { identity: String },

    #[error("Password must be {min}-{max} characters with lowercase, uppercase and digit")]
    WeakSecret { min: usize, max: usize },

    #[error("A verification code was already sent; retry in {retry_after_seconds} seconds")]
    AlreadyIssued { retry_after_seconds: i64 },

    #[error("Failed to deliver verification email")]
    DeliveryFailed,

    #[error("No verification code was requested")]
    NotRequested,

    #[error("Verification code expired")]
    Expired,

    #[error("Maximum verification attempts exceeded")]
    AttemptsExceeded,

    #[error("Invalid verification code ({remaining_attempts} attempts left)")]
    Mismatch { remaining_attempts: u32 },
}

/// Reservation workflow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Account is blacklisted and cannot make reservations")]
    Blacklisted,

    #[error("Required field: {field}")]
    MissingField { field: String },

    #[error("Field too long: {field} (max: {max})")]
    FieldTooLong { field: String, max: usize },

    #[error("Room not found: {room_code}")]
    RoomNotFound { room_code: String },

    #[error("Invalid date: {reason}")]
    InvalidDate { reason: String },

    #[error("Time slot {time_slot} on {date} is already reserved")]
    SlotConflict { date: String, time_slot: String },

    #[error("Operation not permitted")]
    Forbidden,

    #[error("Reservation not found")]
    NotFound,

    #[error("Cannot change reservation from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Room catalog administration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room code already exists: {room_code}")]
    CodeTaken { room_code: String },

    #[error("Invalid room {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// Account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Account already exists")]
    AccountAlreadyExists,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Deny-list administration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenyListError {
    #[error("Account is already blacklisted")]
    AlreadyDenied,
}
