//! Slot conflict detection
//!
//! Two reservations conflict iff they share room, date and an identical slot
//! label while one of them is active. Labels are opaque: `3-4` and `3-5` never
//! conflict.

use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::reservation::Reservation;
use crate::errors::{DomainResult, ReservationError};
use crate::repositories::ReservationRepository;

pub struct ReservationConflictChecker<R: ?Sized> {
    reservations: Arc<R>,
}

impl<R: ?Sized> Clone for ReservationConflictChecker<R> {
    fn clone(&self) -> Self {
        Self {
            reservations: self.reservations.clone(),
        }
    }
}

impl<R: ReservationRepository + ?Sized> ReservationConflictChecker<R> {
    pub fn new(reservations: Arc<R>) -> Self {
        Self { reservations }
    }

    /// The active reservation holding the slot, if any
    pub async fn find_conflict(
        &self,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> DomainResult<Option<Reservation>> {
        self.reservations
            .find_active_in_slot(room_id, date, time_slot)
            .await
    }

    /// Fails with `SlotConflict` when the slot is held
    pub async fn ensure_slot_free(
        &self,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> DomainResult<()> {
        match self.find_conflict(room_id, date, time_slot).await? {
            Some(existing) => {
                tracing::info!(
                    room_id = %room_id,
                    date = %date,
                    time_slot = time_slot,
                    holder = %existing.id,
                    "Slot already reserved"
                );
                Err(slot_conflict(date, time_slot).into())
            }
            None => Ok(()),
        }
    }
}

pub(super) fn slot_conflict(date: NaiveDate, time_slot: &str) -> ReservationError {
    ReservationError::SlotConflict {
        date: date.to_string(),
        time_slot: time_slot.to_string(),
    }
}
