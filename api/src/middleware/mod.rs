//! Middleware for authentication and CORS

pub mod auth;
pub mod cors;

pub use auth::{AuthContext, Claims, IssuedToken, JwtAuth, TokenKind, TokenService};
pub use cors::create_cors;
