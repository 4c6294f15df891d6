//! Account routes
//!
//! Registration and password changes are gated by an emailed verification
//! code; login returns a bearer access token plus a refresh token.

pub mod change_password;
pub mod login;
pub mod refresh;
pub mod register;
pub mod send_code;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/send-register-code", web::post().to(send_code::send_register_code))
            .route("/register", web::post().to(register::register))
            .route("/login", web::post().to(login::login))
            .route("/refresh", web::post().to(refresh::refresh))
            .route(
                "/send-change-password-code",
                web::post().to(send_code::send_change_password_code),
            )
            .route("/change-password", web::post().to(change_password::change_password)),
    );
}
