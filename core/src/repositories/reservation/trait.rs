//! Reservation repository trait.
//!
//! Slot exclusivity is enforced by the store itself: `insert_if_slot_free`
//! must check and insert atomically, and `update_status_if` must only apply
//! when the stored status still equals the expected one.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::reservation::{Reservation, ReservationStatus};
use crate::errors::DomainError;

/// Result of an atomic insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The reservation was stored
    Inserted(Reservation),
    /// An active reservation already holds the slot
    SlotTaken,
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Restrict to one requester; `None` lists everyone's reservations
    pub requester_id: Option<Uuid>,
    pub status: Option<ReservationStatus>,
    pub limit: u32,
}

/// Repository trait for Reservation persistence operations
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation unless an active one already holds its
    /// (room, date, time slot)
    async fn insert_if_slot_free(&self, reservation: Reservation) -> Result<InsertOutcome, DomainError>;

    /// Find a reservation by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, DomainError>;

    /// The active reservation holding a slot, if any
    async fn find_active_in_slot(
        &self,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> Result<Option<Reservation>, DomainError>;

    /// Move a reservation from `expected` to `new_status`
    ///
    /// # Returns
    /// * `Ok(Some(Reservation))` - Updated reservation
    /// * `Ok(None)` - Not found, or its status no longer equals `expected`
    async fn update_status_if(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        new_status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, DomainError>;

    /// Reservations matching `filter`, newest first by (date desc, created_at desc)
    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError>;

    /// Active reservations of a room within an inclusive date range,
    /// ordered by (date asc, time_slot asc)
    async fn list_active_for_room(
        &self,
        room_id: Uuid,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError>;
}
