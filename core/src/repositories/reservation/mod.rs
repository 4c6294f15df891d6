//! Reservation repository module.

mod r#trait;
pub use r#trait::{InsertOutcome, ReservationFilter, ReservationRepository};

mod mock;
pub use mock::MockReservationRepository;
