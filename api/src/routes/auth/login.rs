use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AccountView, LoginRequest, LoginResponse};
use crate::handlers::ApiError;
use crate::middleware::TokenService;

/// Handler for POST /api/auth/login
///
/// Wrong password and unknown email both answer 401 `INVALID_CREDENTIALS`.
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let account = state
        .accounts
        .authenticate(&request.email, &request.password)
        .await?;
    let access = tokens.issue(&account)?;
    let refresh = tokens.issue_refresh(&account)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
        access_token: access.token,
        refresh_token: refresh.token,
        token_type: "Bearer".to_string(),
        expires_in: access.expires_in,
        refresh_expires_in: refresh.expires_in,
        account: AccountView::from(&account),
    })))
}
