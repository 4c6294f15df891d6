//! Reservation workflow module
//!
//! - slot conflict detection on (room, date, time slot) among active bookings
//! - creation with deny-list, field, room and date validation
//! - staff review (approve/reject) and owner cancellation
//! - listings and public occupancy queries

mod config;
mod conflict;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::ReservationConfig;
pub use conflict::ReservationConflictChecker;
pub use service::ReservationWorkflow;
pub use types::{is_storable_date, NewReservation, ReservationListQuery, MAX_BOOKING_YEAR, MIN_BOOKING_YEAR};
