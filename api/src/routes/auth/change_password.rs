use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ChangePasswordRequest;
use crate::handlers::ApiError;

/// Handler for POST /api/auth/change-password
pub async fn change_password(
    state: web::Data<AppState>,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    state
        .accounts
        .change_secret(&request.email, &request.new_password, &request.code)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Password changed")))
}
