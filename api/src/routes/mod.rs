//! HTTP routes, one module per resource

pub mod auth;
pub mod deny_list;
pub mod reservations;
pub mod rooms;
