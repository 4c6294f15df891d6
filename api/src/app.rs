//! Application state and factory
//!
//! The core services are generic over their collaborators. The API erases
//! them to trait objects once, here, so handlers and tests share one state
//! type whether the backends are MySQL/Redis or in-memory.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use cr_core::repositories::{AccountRepository, DenyListRepository, ReservationRepository, RoomCatalog};
use cr_core::services::{
    AccountService, Clock, DenyListService, MailServiceTrait, ReservationConfig, ReservationWorkflow,
    RoomService, SecretHasher, SystemClock, VerificationConfig, VerificationService, VerificationStore,
};
use cr_infra::InfrastructureServices;
use cr_shared::{error_codes, ErrorResponse, JwtConfig};

use crate::middleware::TokenService;
use crate::routes;

pub type DynAccountService =
    AccountService<dyn AccountRepository, dyn SecretHasher, dyn MailServiceTrait, dyn VerificationStore>;

pub type DynReservationWorkflow = ReservationWorkflow<
    dyn ReservationRepository,
    dyn RoomCatalog,
    dyn DenyListRepository,
    dyn AccountRepository,
    dyn MailServiceTrait,
>;

pub type DynDenyListService = DenyListService<dyn AccountRepository, dyn DenyListRepository>;

pub type DynRoomService = RoomService<dyn RoomCatalog>;

/// Collaborators the services are built from
#[derive(Clone)]
pub struct Backends {
    pub accounts: Arc<dyn AccountRepository>,
    pub deny_list: Arc<dyn DenyListRepository>,
    pub rooms: Arc<dyn RoomCatalog>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub verification_store: Arc<dyn VerificationStore>,
    pub mail: Arc<dyn MailServiceTrait>,
    pub hasher: Arc<dyn SecretHasher>,
    pub clock: Arc<dyn Clock>,
}

impl From<&InfrastructureServices> for Backends {
    fn from(infra: &InfrastructureServices) -> Self {
        Self {
            accounts: infra.accounts.clone(),
            deny_list: infra.deny_list.clone(),
            rooms: infra.rooms.clone(),
            reservations: infra.reservations.clone(),
            verification_store: infra.verification_store.clone(),
            mail: infra.mail.clone(),
            hasher: infra.hasher.clone(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Application state shared by every handler
pub struct AppState {
    pub accounts: DynAccountService,
    pub reservations: DynReservationWorkflow,
    pub rooms: DynRoomService,
    pub deny_list: DynDenyListService,
}

impl AppState {
    pub fn new(
        backends: Backends,
        verification_config: VerificationConfig,
        reservation_config: ReservationConfig,
    ) -> Self {
        let verification = Arc::new(VerificationService::new(
            backends.mail.clone(),
            backends.verification_store,
            backends.clock.clone(),
            verification_config,
        ));

        Self {
            accounts: AccountService::new(
                backends.accounts.clone(),
                backends.hasher,
                verification,
                backends.clock.clone(),
            ),
            rooms: RoomService::new(backends.rooms.clone(), backends.clock.clone()),
            reservations: ReservationWorkflow::new(
                backends.reservations,
                backends.rooms,
                backends.deny_list.clone(),
                backends.accounts.clone(),
                backends.mail,
                backends.clock,
                reservation_config,
            ),
            deny_list: DenyListService::new(backends.accounts, backends.deny_list),
        }
    }
}

/// Register state, routes and the JSON fallbacks on an app
///
/// Used by the binary and by tests through `App::new().configure(...)`.
pub fn configure(
    state: web::Data<AppState>,
    tokens: web::Data<TokenService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(state)
            .app_data(tokens)
            .app_data(json_config())
            .app_data(query_config())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .configure(routes::auth::configure)
                    .configure(routes::rooms::configure)
                    .configure(routes::reservations::configure)
                    .configure(routes::deny_list::configure),
            )
            .default_service(web::route().to(not_found));
    }
}

/// Token service built from configuration
pub fn token_service(config: &JwtConfig) -> web::Data<TokenService> {
    web::Data::new(TokenService::new(config))
}

/// Malformed JSON bodies answer with the shared error envelope
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
            actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
                .into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "classroom-reservation-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
