//! In-memory implementation of ReservationRepository
//!
//! A single mutex guards the map, so check-and-insert and compare-and-set are
//! atomic with respect to each other.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::reservation::{Reservation, ReservationStatus};
use crate::errors::DomainError;

use super::r#trait::{InsertOutcome, ReservationFilter, ReservationRepository};

#[derive(Clone, Default)]
pub struct MockReservationRepository {
    reservations: Arc<Mutex<HashMap<Uuid, Reservation>>>,
}

impl MockReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reservation as-is, bypassing the slot check
    pub async fn seed(&self, reservation: Reservation) {
        self.reservations
            .lock()
            .await
            .insert(reservation.id, reservation);
    }

    pub async fn len(&self) -> usize {
        self.reservations.lock().await.len()
    }
}

#[async_trait]
impl ReservationRepository for MockReservationRepository {
    async fn insert_if_slot_free(&self, reservation: Reservation) -> Result<InsertOutcome, DomainError> {
        let mut reservations = self.reservations.lock().await;

        let taken = reservations.values().any(|r| {
            r.occupies(reservation.room_id, reservation.date, &reservation.time_slot)
        });
        if taken && reservation.status.is_active() {
            return Ok(InsertOutcome::SlotTaken);
        }

        reservations.insert(reservation.id, reservation.clone());
        Ok(InsertOutcome::Inserted(reservation))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, DomainError> {
        Ok(self.reservations.lock().await.get(&id).cloned())
    }

    async fn find_active_in_slot(
        &self,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        let reservations = self.reservations.lock().await;
        Ok(reservations
            .values()
            .find(|r| r.occupies(room_id, date, time_slot))
            .cloned())
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        new_status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, DomainError> {
        let mut reservations = self.reservations.lock().await;
        match reservations.get_mut(&id) {
            Some(r) if r.status == expected => {
                r.status = new_status;
                r.updated_at = now;
                Ok(Some(r.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError> {
        let reservations = self.reservations.lock().await;
        let mut matching: Vec<Reservation> = reservations
            .values()
            .filter(|r| filter.requester_id.map_or(true, |id| r.requester_id == id))
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matching.truncate(filter.limit as usize);
        Ok(matching)
    }

    async fn list_active_for_room(
        &self,
        room_id: Uuid,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError> {
        let reservations = self.reservations.lock().await;
        let mut active: Vec<Reservation> = reservations
            .values()
            .filter(|r| r.room_id == room_id && r.status.is_active())
            .filter(|r| r.date >= date_from && r.date <= date_to)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time_slot.cmp(&b.time_slot)));
        Ok(active)
    }
}
