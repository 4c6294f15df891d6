//! CORS middleware configuration

use actix_cors::Cors;
use actix_web::http::{header, Method};

use cr_shared::CorsConfig;

/// Build the CORS middleware from configuration
///
/// `*` in `allowed_origins` accepts any origin; otherwise only the listed
/// origins are allowed.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        .expose_headers(vec![header::RETRY_AFTER])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::warn!("CORS allows any origin");
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| cors.allowed_origin(origin))
}
