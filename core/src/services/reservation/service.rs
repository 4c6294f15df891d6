//! Reservation workflow implementation

use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use uuid::Uuid;

use cr_shared::utils::masking::mask_identity;

use crate::domain::entities::reservation::{OccupiedSlot, Reservation, ReservationStatus};
use crate::domain::value_objects::Principal;
use crate::errors::{DomainResult, ReservationError};
use crate::repositories::{
    AccountRepository, DenyListRepository, InsertOutcome, ReservationFilter, ReservationRepository,
    RoomCatalog,
};
use crate::services::clock::Clock;
use crate::services::notification::{MailServiceTrait, Notifier};

use super::config::ReservationConfig;
use super::conflict::{slot_conflict, ReservationConflictChecker};
use super::types::{is_storable_date, NewReservation, ReservationListQuery};

/// Orchestrates booking, review, cancellation and occupancy queries
pub struct ReservationWorkflow<R: ?Sized, C: ?Sized, D: ?Sized, A: ?Sized, M: MailServiceTrait + ?Sized> {
    reservations: Arc<R>,
    rooms: Arc<C>,
    deny_list: Arc<D>,
    accounts: Arc<A>,
    conflicts: ReservationConflictChecker<R>,
    notifier: Notifier<M>,
    clock: Arc<dyn Clock>,
    config: ReservationConfig,
}

impl<R, C, D, A, M> ReservationWorkflow<R, C, D, A, M>
where
    R: ReservationRepository + ?Sized,
    C: RoomCatalog + ?Sized,
    D: DenyListRepository + ?Sized,
    A: AccountRepository + ?Sized,
    M: MailServiceTrait + ?Sized + 'static,
{
    /// Create a new reservation workflow
    ///
    /// # Arguments
    ///
    /// * `reservations` - Reservation store with atomic slot insert
    /// * `rooms` - Room catalog
    /// * `deny_list` - Deny-list membership
    /// * `accounts` - Identity store, used to find staff recipients
    /// * `mail_service` - Delivery for best-effort notices
    /// * `clock` - Time source
    /// * `config` - Workflow configuration
    pub fn new(
        reservations: Arc<R>,
        rooms: Arc<C>,
        deny_list: Arc<D>,
        accounts: Arc<A>,
        mail_service: Arc<M>,
        clock: Arc<dyn Clock>,
        config: ReservationConfig,
    ) -> Self {
        Self {
            conflicts: ReservationConflictChecker::new(reservations.clone()),
            reservations,
            rooms,
            deny_list,
            accounts,
            notifier: Notifier::new(mail_service),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ReservationConfig {
        &self.config
    }

    /// Book a room slot for `requester`
    ///
    /// Checks, in order: deny-list, required fields, field lengths, room,
    /// date, slot availability. The new reservation starts as `pending` and
    /// staff are notified without waiting for delivery.
    pub async fn create_reservation(
        &self,
        requester: &Principal,
        request: NewReservation,
    ) -> DomainResult<Reservation> {
        if self.deny_list.contains(requester.account_id).await? {
            tracing::warn!(
                account_id = %requester.account_id,
                event = "reservation_blacklisted",
                "Denied account attempted a reservation"
            );
            return Err(ReservationError::Blacklisted.into());
        }

        let room_code = request.room_code.trim();
        let date = request.date.trim();
        let time_slot = request.time_slot.trim();
        let reason = request.reason.trim();

        for (field, value) in [("room_code", room_code), ("date", date), ("time_slot", time_slot)] {
            if value.is_empty() {
                return Err(ReservationError::MissingField {
                    field: field.to_string(),
                }
                .into());
            }
        }
        check_length("time_slot", time_slot, self.config.time_slot_max_len)?;
        check_length("reason", reason, self.config.reason_max_len)?;

        let room = self
            .rooms
            .find_by_code(room_code)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| ReservationError::RoomNotFound {
                room_code: room_code.to_string(),
            })?;

        let date = self.parse_booking_date(date)?;

        self.conflicts
            .ensure_slot_free(room.id, date, time_slot)
            .await?;

        let reservation = Reservation::new_pending(
            room.id,
            room.code.clone(),
            requester.account_id,
            requester.identity.clone(),
            date,
            time_slot.to_string(),
            reason.to_string(),
            self.clock.now(),
        );

        // The store re-checks atomically; losing a race here is a conflict too
        let reservation = match self.reservations.insert_if_slot_free(reservation).await? {
            InsertOutcome::Inserted(r) => r,
            InsertOutcome::SlotTaken => return Err(slot_conflict(date, time_slot).into()),
        };

        tracing::info!(
            reservation_id = %reservation.id,
            room = %reservation.room_code,
            date = %reservation.date,
            time_slot = %reservation.time_slot,
            requester = %mask_identity(&reservation.requester_identity),
            event = "reservation_created",
            "Reservation created"
        );

        match self.accounts.list_staff().await {
            Ok(staff) => self.notifier.reservation_created(
                &reservation,
                staff.into_iter().map(|a| a.identity).collect(),
            ),
            Err(error) => tracing::warn!(
                reservation_id = %reservation.id,
                error = %error,
                "Could not load staff recipients, notification skipped"
            ),
        }

        Ok(reservation)
    }

    /// The caller's reservations, or everyone's for staff with `view_all`
    pub async fn list_reservations(
        &self,
        caller: &Principal,
        query: ReservationListQuery,
    ) -> DomainResult<Vec<Reservation>> {
        let requester_id = if query.view_all && caller.is_staff {
            None
        } else {
            Some(caller.account_id)
        };

        let filter = ReservationFilter {
            requester_id,
            status: query.status,
            limit: self.config.clamp_limit(query.limit),
        };
        self.reservations.list(&filter).await
    }

    /// Staff decision on a pending reservation
    pub async fn set_status(
        &self,
        caller: &Principal,
        reservation_id: Uuid,
        new_status: ReservationStatus,
    ) -> DomainResult<Reservation> {
        if !caller.is_staff {
            return Err(ReservationError::Forbidden.into());
        }

        let current = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(ReservationError::NotFound)?;

        if !new_status.is_review_decision() || current.status != ReservationStatus::Pending {
            return Err(invalid_transition(current.status, new_status).into());
        }

        let updated = self
            .reservations
            .update_status_if(
                reservation_id,
                ReservationStatus::Pending,
                new_status,
                self.clock.now(),
            )
            .await?
            .ok_or_else(|| invalid_transition(current.status, new_status))?;

        tracing::info!(
            reservation_id = %updated.id,
            status = %updated.status,
            staff_id = %caller.account_id,
            event = "reservation_reviewed",
            "Reservation reviewed"
        );
        self.notifier.status_changed(&updated);

        Ok(updated)
    }

    /// Owner cancels a pending or approved reservation
    pub async fn cancel(&self, caller: &Principal, reservation_id: Uuid) -> DomainResult<Reservation> {
        let current = self
            .reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or(ReservationError::NotFound)?;

        if !current.is_owned_by(caller.account_id) {
            return Err(ReservationError::Forbidden.into());
        }
        if !current.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(invalid_transition(current.status, ReservationStatus::Cancelled).into());
        }

        let updated = self
            .reservations
            .update_status_if(
                reservation_id,
                current.status,
                ReservationStatus::Cancelled,
                self.clock.now(),
            )
            .await?
            .ok_or_else(|| invalid_transition(current.status, ReservationStatus::Cancelled))?;

        tracing::info!(
            reservation_id = %updated.id,
            previous_status = %current.status,
            event = "reservation_cancelled",
            "Reservation cancelled"
        );
        self.notifier.reservation_cancelled(&updated);

        Ok(updated)
    }

    /// Active bookings of a room between two dates, inclusive
    ///
    /// `date_from` defaults to today and `date_to` to `date_from` plus the
    /// occupancy window. An unknown room yields an empty list.
    pub async fn occupied_slots(
        &self,
        room_code: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> DomainResult<Vec<OccupiedSlot>> {
        let room = match self.rooms.find_by_code(room_code.trim()).await? {
            Some(room) => room,
            None => return Ok(Vec::new()),
        };

        let from = date_from.unwrap_or_else(|| self.config.local_today(self.clock.now()));
        let to = date_to.unwrap_or_else(|| {
            from.checked_add_signed(Duration::days(self.config.occupancy_window_days))
                .unwrap_or(NaiveDate::MAX)
        });
        if to < from {
            return Ok(Vec::new());
        }

        let active = self
            .reservations
            .list_active_for_room(room.id, from, to)
            .await?;
        Ok(active.iter().map(OccupiedSlot::from).collect())
    }

    fn parse_booking_date(&self, raw: &str) -> Result<NaiveDate, ReservationError> {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| ReservationError::InvalidDate {
            reason: "expected YYYY-MM-DD".to_string(),
        })?;
        if !is_storable_date(date) {
            return Err(ReservationError::InvalidDate {
                reason: "year out of range".to_string(),
            });
        }

        let today = self.config.local_today(self.clock.now());
        if date < today {
            return Err(ReservationError::InvalidDate {
                reason: "date is in the past".to_string(),
            });
        }
        Ok(date)
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ReservationError> {
    if value.chars().count() > max {
        return Err(ReservationError::FieldTooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn invalid_transition(from: ReservationStatus, to: ReservationStatus) -> ReservationError {
    ReservationError::InvalidTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
}
