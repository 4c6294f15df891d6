//! Reservation routes
//!
//! Everything except the occupancy view requires a bearer token.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use cr_core::errors::{DomainError, ReservationError};
use cr_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::reservation::{
    CreateReservationRequest, ListReservationsParams, OccupiedParams, StatusUpdateRequest,
};
use crate::handlers::ApiError;
use crate::middleware::{AuthContext, JwtAuth};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reservations")
            .route("/occupied", web::get().to(occupied))
            .service(
                web::resource("")
                    .wrap(JwtAuth)
                    .route(web::get().to(list_reservations))
                    .route(web::post().to(create_reservation)),
            )
            .service(
                web::resource("/{id}/status")
                    .wrap(JwtAuth)
                    .route(web::patch().to(update_status)),
            )
            .service(
                web::resource("/{id}/cancel")
                    .wrap(JwtAuth)
                    .route(web::post().to(cancel_reservation)),
            ),
    );
}

/// GET /api/reservations?view_all=true&status=pending&limit=50
pub async fn list_reservations(
    state: web::Data<AppState>,
    auth: AuthContext,
    params: web::Query<ListReservationsParams>,
) -> Result<HttpResponse, ApiError> {
    let query = params.into_inner().into_query()?;
    let reservations = state
        .reservations
        .list_reservations(auth.principal(), query)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reservations)))
}

/// POST /api/reservations
pub async fn create_reservation(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<CreateReservationRequest>,
) -> Result<HttpResponse, ApiError> {
    let reservation = state
        .reservations
        .create_reservation(auth.principal(), request.into_inner().into())
        .await?;
    Ok(HttpResponse::Created()
        .json(ApiResponse::success(reservation).with_message("Reservation submitted")))
}

/// PATCH /api/reservations/{id}/status (staff)
pub async fn update_status(
    state: web::Data<AppState>,
    auth: AuthContext,
    id: web::Path<String>,
    request: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let status = request.parse()?;
    let reservation = state
        .reservations
        .set_status(auth.principal(), parse_id(&id)?, status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reservation)))
}

/// POST /api/reservations/{id}/cancel (owner)
pub async fn cancel_reservation(
    state: web::Data<AppState>,
    auth: AuthContext,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let reservation = state
        .reservations
        .cancel(auth.principal(), parse_id(&id)?)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reservation).with_message("Reservation cancelled")))
}

/// GET /api/reservations/occupied?classroom=INS201&date_from=...&date_to=...
pub async fn occupied(
    state: web::Data<AppState>,
    params: web::Query<OccupiedParams>,
) -> Result<HttpResponse, ApiError> {
    let query = params.into_inner().parse()?;
    let slots = state
        .reservations
        .occupied_slots(&query.room_code, query.date_from, query.date_to)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(slots)))
}

/// A malformed id cannot name a reservation
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Domain(DomainError::from(ReservationError::NotFound)))
}
