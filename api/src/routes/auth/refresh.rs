use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{RefreshTokenRequest, RefreshTokenResponse};
use crate::handlers::ApiError;
use crate::middleware::TokenService;

/// Handler for POST /api/auth/refresh
///
/// Trades a refresh token for a new access token. The account is reloaded
/// so a staff flag changed since login is reflected in the new token.
///
/// ## Errors
/// - 401 Unauthorized: invalid, expired or wrong-kind token, or the account is gone
pub async fn refresh(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let claims = tokens.verify_refresh(&request.refresh_token).map_err(|e| {
        tracing::debug!(error = %e, "Refresh token rejected");
        ApiError::unauthorized("Invalid or expired refresh token")
    })?;
    let account_id = claims
        .account_id()
        .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;

    let account = state
        .accounts
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired refresh token"))?;
    let access = tokens.issue(&account)?;

    tracing::info!(account_id = %account.id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(ApiResponse::success(RefreshTokenResponse {
        access_token: access.token,
        token_type: "Bearer".to_string(),
        expires_in: access.expires_in,
    })))
}
