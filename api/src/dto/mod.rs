//! Request and response bodies

pub mod auth;
pub mod deny_list;
pub mod reservation;
pub mod room;
