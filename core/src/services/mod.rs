//! Business services containing domain logic and use cases.

pub mod account;
pub mod clock;
pub mod deny_list;
pub mod notification;
pub mod reservation;
pub mod room;
pub mod verification;

// Re-export commonly used types
pub use account::{AccountService, MockSecretHasher, SecretHasher};
pub use clock::{Clock, ManualClock, SystemClock};
pub use deny_list::{AccountPartition, AccountSummary, DenyListService};
pub use notification::{MailServiceTrait, MockMailService, Notifier, SentMail};
pub use reservation::{
    is_storable_date, NewReservation, ReservationConfig, ReservationConflictChecker, ReservationListQuery,
    ReservationWorkflow,
};
pub use room::{BuildingSummary, CatalogStats, EquipmentCounts, RoomDraft, RoomService};
pub use verification::{
    IssuedCode, MockVerificationStore, VerificationConfig, VerificationService, VerificationStore,
};
