//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, DenyListError, ReservationError, RoomError, VerificationError};

use cr_shared::error_codes;
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Operation not permitted")]
    Forbidden,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    DenyList(#[from] DenyListError),
}

impl DomainError {
    /// Shorthand for an internal (store or collaborator) failure
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::Forbidden => error_codes::FORBIDDEN,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Verification(e) => match e {
                VerificationError::InvalidFormat { .. } => error_codes::INVALID_IDENTITY_FORMAT,
                VerificationError::WeakSecret { .. } => error_codes::WEAK_SECRET,
                VerificationError::AlreadyIssued { .. } => error_codes::CODE_ALREADY_ISSUED,
                VerificationError::DeliveryFailed => error_codes::DELIVERY_FAILED,
                VerificationError::NotRequested => error_codes::CODE_NOT_REQUESTED,
                VerificationError::Expired => error_codes::CODE_EXPIRED,
                VerificationError::AttemptsExceeded => error_codes::ATTEMPTS_EXCEEDED,
                VerificationError::Mismatch { .. } => error_codes::CODE_MISMATCH,
            },
            DomainError::Reservation(e) => match e {
                ReservationError::Blacklisted => error_codes::BLACKLISTED,
                ReservationError::MissingField { .. } => error_codes::MISSING_FIELD,
                ReservationError::FieldTooLong { .. } => error_codes::FIELD_TOO_LONG,
                ReservationError::RoomNotFound { .. } => error_codes::ROOM_NOT_FOUND,
                ReservationError::InvalidDate { .. } => error_codes::INVALID_DATE,
                ReservationError::SlotConflict { .. } => error_codes::SLOT_CONFLICT,
                ReservationError::Forbidden => error_codes::FORBIDDEN,
                ReservationError::NotFound => error_codes::RESERVATION_NOT_FOUND,
                ReservationError::InvalidTransition { .. } => error_codes::INVALID_TRANSITION,
            },
            DomainError::Room(e) => match e {
                RoomError::CodeTaken { .. } => error_codes::ROOM_CODE_TAKEN,
                RoomError::InvalidField { .. } => error_codes::VALIDATION_ERROR,
            },
            DomainError::Auth(e) => match e {
                AuthError::AccountAlreadyExists => error_codes::ACCOUNT_EXISTS,
                AuthError::AccountNotFound => error_codes::ACCOUNT_NOT_FOUND,
                AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            },
            DomainError::DenyList(DenyListError::AlreadyDenied) => error_codes::ALREADY_DENIED,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridged_error_codes() {
        let err: DomainError = VerificationError::AttemptsExceeded.into();
        assert_eq!(err.error_code(), "ATTEMPTS_EXCEEDED");

        let err: DomainError = ReservationError::SlotConflict {
            date: "2025-11-30".into(),
            time_slot: "10-12".into(),
        }
        .into();
        assert_eq!(err.error_code(), "SLOT_CONFLICT");
        assert!(err.to_string().contains("10-12"));
    }

    #[test]
    fn test_forbidden_and_not_found_are_distinct() {
        let forbidden: DomainError = ReservationError::Forbidden.into();
        let missing: DomainError = ReservationError::NotFound.into();
        assert_ne!(forbidden.error_code(), missing.error_code());
    }
}
