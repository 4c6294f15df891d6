//! Mapping of domain and request errors to HTTP responses

use actix_web::{http::header, http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;
use validator::ValidationErrors;

use cr_core::errors::{
    AuthError, DenyListError, DomainError, ReservationError, RoomError, VerificationError,
};
use cr_shared::{error_codes, ErrorResponse};

/// Error returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Invalid request data")]
    Validation(HashMap<String, Vec<String>>),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ApiError::Validation(fields)
    }
}

/// HTTP status for a domain error
pub fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Forbidden => StatusCode::FORBIDDEN,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Verification(e) => match e {
            VerificationError::AlreadyIssued { .. } | VerificationError::AttemptsExceeded => {
                StatusCode::TOO_MANY_REQUESTS
            }
            VerificationError::DeliveryFailed => StatusCode::SERVICE_UNAVAILABLE,
            VerificationError::InvalidFormat { .. }
            | VerificationError::WeakSecret { .. }
            | VerificationError::NotRequested
            | VerificationError::Expired
            | VerificationError::Mismatch { .. } => StatusCode::BAD_REQUEST,
        },
        DomainError::Reservation(e) => match e {
            ReservationError::Blacklisted | ReservationError::Forbidden => StatusCode::FORBIDDEN,
            ReservationError::RoomNotFound { .. } | ReservationError::NotFound => StatusCode::NOT_FOUND,
            ReservationError::SlotConflict { .. } | ReservationError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            ReservationError::MissingField { .. }
            | ReservationError::FieldTooLong { .. }
            | ReservationError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
        },
        DomainError::Room(e) => match e {
            RoomError::CodeTaken { .. } => StatusCode::CONFLICT,
            RoomError::InvalidField { .. } => StatusCode::BAD_REQUEST,
        },
        DomainError::Auth(e) => match e {
            AuthError::AccountAlreadyExists => StatusCode::CONFLICT,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        },
        DomainError::DenyList(DenyListError::AlreadyDenied) => StatusCode::CONFLICT,
    }
}

/// Response body for a domain error, with structured details where the
/// client can act on them
fn domain_body(error: &DomainError) -> ErrorResponse {
    if let DomainError::Internal { .. } = error {
        // Store details stay in the log
        return ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred");
    }

    let body = ErrorResponse::new(error.error_code(), error.to_string());
    match error {
        DomainError::Verification(VerificationError::AlreadyIssued { retry_after_seconds }) => {
            body.add_detail("retry_after_seconds", retry_after_seconds)
        }
        DomainError::Verification(VerificationError::Mismatch { remaining_attempts }) => {
            body.add_detail("remaining_attempts", remaining_attempts)
        }
        DomainError::Reservation(ReservationError::SlotConflict { date, time_slot }) => body
            .add_detail("date", date)
            .add_detail("time_slot", time_slot),
        DomainError::Reservation(ReservationError::MissingField { field }) => {
            body.add_detail("field", field)
        }
        DomainError::Reservation(ReservationError::FieldTooLong { field, max }) => body
            .add_detail("field", field)
            .add_detail("max", max),
        DomainError::Room(RoomError::InvalidField { field, .. }) => body.add_detail("field", field),
        _ => body,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => domain_status(e),
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let body = match self {
            ApiError::Domain(e) => {
                if status.is_server_error() {
                    tracing::error!(error = %e, code = e.error_code(), "Request failed");
                } else {
                    tracing::debug!(error = %e, code = e.error_code(), "Request rejected");
                }
                domain_body(e)
            }
            ApiError::Unauthorized(message) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, message.clone())
            }
            ApiError::BadRequest { code, message } => ErrorResponse::new(*code, message.clone()),
            ApiError::Validation(fields) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, self.to_string())
                    .add_detail("fields", fields)
            }
        };

        let mut response = HttpResponse::build(status);
        if let ApiError::Domain(DomainError::Verification(VerificationError::AlreadyIssued {
            retry_after_seconds,
        })) = self
        {
            response.insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()));
        }
        response.json(body)
    }
}
