//! Deny-list routes
//!
//! `check` is open to any signed-in account; the rest are staff only.

use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::deny_list::{BanRequest, DenyCheckResponse, UnbanRequest};
use crate::handlers::ApiError;
use crate::middleware::{AuthContext, JwtAuth};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/deny-list")
            .wrap(JwtAuth)
            .route("/check", web::get().to(check))
            .route("/accounts", web::get().to(list_accounts))
            .route("/ban", web::post().to(ban))
            .route("/unban", web::post().to(unban)),
    );
}

/// GET /api/deny-list/check
pub async fn check(state: web::Data<AppState>, auth: AuthContext) -> Result<HttpResponse, ApiError> {
    let blacklisted = state.deny_list.is_denied(auth.principal()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(DenyCheckResponse { blacklisted })))
}

/// GET /api/deny-list/accounts
pub async fn list_accounts(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let partition = state.deny_list.list_accounts(auth.principal()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(partition)))
}

/// POST /api/deny-list/ban
pub async fn ban(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<BanRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    state
        .deny_list
        .ban(auth.principal(), request.account_id, &request.reason)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Account blacklisted")))
}

/// POST /api/deny-list/unban
pub async fn unban(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<UnbanRequest>,
) -> Result<HttpResponse, ApiError> {
    state
        .deny_list
        .unban(auth.principal(), request.account_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Account removed from blacklist")))
}
