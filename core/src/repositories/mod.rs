//! Repository interfaces and their in-memory implementations.

pub mod account;
pub mod deny_list;
pub mod reservation;
pub mod room;

pub use account::{AccountRepository, MockAccountRepository};
pub use deny_list::{DenyListRepository, MockDenyListRepository};
pub use reservation::{InsertOutcome, MockReservationRepository, ReservationFilter, ReservationRepository};
pub use room::{MockRoomCatalog, RoomCatalog, RoomOrdering, RoomSearch, RoomSortKey};
