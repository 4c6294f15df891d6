//! Domain entities representing core business objects.

pub mod account;
pub mod deny_list;
pub mod reservation;
pub mod room;
pub mod verification;

// Re-export commonly used types
pub use account::Account;
pub use deny_list::DenyListEntry;
pub use reservation::{OccupiedSlot, Reservation, ReservationStatus};
pub use room::{Building, Room, RoomEquipment, RoomType};
pub use verification::{
    VerificationPurpose, VerificationRecord, CODE_LENGTH, CODE_MAX, CODE_MIN,
    DEFAULT_TTL_SECONDS, MAX_ATTEMPTS,
};
