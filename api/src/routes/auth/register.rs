use actix_web::{web, HttpResponse};
use validator::Validate;

use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AccountView, RegisterRequest};
use crate::handlers::ApiError;

/// Handler for POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;
    let request = request.into_inner();

    let account = state
        .accounts
        .register(&request.email, &request.name, &request.password, &request.code)
        .await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::success(AccountView::from(&account)).with_message("Account registered")))
}
