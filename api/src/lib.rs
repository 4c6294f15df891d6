//! HTTP layer of the classroom reservation server

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{configure, token_service, AppState, Backends};
