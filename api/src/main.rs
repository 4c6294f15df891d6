use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use cr_api::{configure, middleware::create_cors, telemetry, token_service, AppState, Backends};
use cr_core::services::{ReservationConfig, VerificationConfig};
use cr_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    telemetry::init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting classroom reservation API"
    );
    if config.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set; using the built-in development secret");
    }

    let infra = cr_infra::initialize(&config).await?;

    let state = web::Data::new(AppState::new(
        Backends::from(&infra),
        VerificationConfig::from_env(),
        ReservationConfig::from_env(),
    ));
    let tokens = token_service(&config.jwt);
    let cors_config = config.cors.clone();

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(create_cors(&cors_config))
            .wrap(TracingLogger::default())
            .configure(configure(state.clone(), tokens.clone()))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    infra.database.close().await;
    tracing::info!("Server stopped");
    Ok(())
}
