use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::{mask_identity, ApiResponse};

use crate::app::AppState;
use crate::dto::auth::{SendCodeRequest, SendCodeResponse};
use crate::handlers::ApiError;

/// Handler for POST /api/auth/send-register-code
///
/// Emails a registration code to an address that has no account yet.
///
/// ## Errors
/// - 400 `INVALID_IDENTITY_FORMAT` outside the campus domain
/// - 409 `ACCOUNT_EXISTS`
/// - 429 `CODE_ALREADY_ISSUED` with `Retry-After`
/// - 503 `DELIVERY_FAILED`
pub async fn send_register_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    tracing::debug!(identity = %mask_identity(&request.email), "send_register_code");

    let issued = state.accounts.send_register_code(&request.email).await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::success(SendCodeResponse::from(issued)).with_message("Verification code sent"),
    ))
}

/// Handler for POST /api/auth/send-change-password-code
///
/// Same as registration, but the account must exist (404 `ACCOUNT_NOT_FOUND`).
pub async fn send_change_password_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    tracing::debug!(identity = %mask_identity(&request.email), "send_change_password_code");

    let issued = state.accounts.send_change_secret_code(&request.email).await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::success(SendCodeResponse::from(issued)).with_message("Verification code sent"),
    ))
}
