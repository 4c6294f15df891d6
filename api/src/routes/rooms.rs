//! Room catalog routes
//!
//! Reads are public; creating, editing and deleting rooms need a staff
//! bearer token.

use actix_web::{web, HttpResponse};

use cr_core::errors::{DomainError, ReservationError};
use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::room::{CreateRoomRequest, RoomAttributes, RoomListParams};
use crate::handlers::ApiError;
use crate::middleware::{AuthContext, JwtAuth};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rooms")
            .route("/buildings", web::get().to(list_buildings))
            .route("/stats", web::get().to(catalog_stats))
            .service(
                web::resource("")
                    .route(web::get().to(list_rooms))
                    .route(web::post().to(create_room).wrap(JwtAuth)),
            )
            .service(
                web::resource("/{code}")
                    .route(web::get().to(get_room))
                    .route(web::put().to(update_room).wrap(JwtAuth))
                    .route(web::delete().to(delete_room).wrap(JwtAuth)),
            ),
    );
}

/// GET /api/rooms?building=INS&search=lab&min_capacity=40&has_projector=true&ordering=-capacity
pub async fn list_rooms(
    state: web::Data<AppState>,
    params: web::Query<RoomListParams>,
) -> Result<HttpResponse, ApiError> {
    let search = params.parse()?;
    let rooms = state.rooms.search(&search).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rooms)))
}

/// GET /api/rooms/{code}
pub async fn get_room(
    state: web::Data<AppState>,
    code: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let code = code.into_inner();
    let room = state
        .rooms
        .find(&code)
        .await?
        .ok_or(ReservationError::RoomNotFound { room_code: code })
        .map_err(DomainError::from)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(room)))
}

/// GET /api/rooms/buildings
pub async fn list_buildings(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let buildings = state.rooms.buildings().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(buildings)))
}

/// GET /api/rooms/stats
pub async fn catalog_stats(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = state.rooms.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

/// POST /api/rooms (staff)
pub async fn create_room(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    let draft = request.attributes.into_draft()?;
    let room = state
        .rooms
        .create(auth.principal(), &request.code, draft)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(room)))
}

/// PUT /api/rooms/{code} (staff)
pub async fn update_room(
    state: web::Data<AppState>,
    auth: AuthContext,
    code: web::Path<String>,
    request: web::Json<RoomAttributes>,
) -> Result<HttpResponse, ApiError> {
    let draft = request.into_inner().into_draft()?;
    let room = state.rooms.update(auth.principal(), &code, draft).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(room)))
}

/// DELETE /api/rooms/{code} (staff)
pub async fn delete_room(
    state: web::Data<AppState>,
    auth: AuthContext,
    code: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state.rooms.delete(auth.principal(), &code).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Room deleted")))
}
