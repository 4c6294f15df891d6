//! Reservation entity and its status state machine.
//!
//! ```text
//! pending ──► approved ──► cancelled
//!    │
//!    ├──────► rejected
//!    └──────► cancelled
//! ```
//!
//! `rejected` and `cancelled` are terminal. A reservation in `pending` or
//! `approved` is *active* and holds its (room, date, time slot).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a reservation in this status occupies its slot
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Approved)
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Rejected | ReservationStatus::Cancelled)
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Cancelled) | (Approved, Cancelled)
        )
    }

    /// Whether this status is a staff review decision
    pub fn is_review_decision(&self) -> bool {
        matches!(self, ReservationStatus::Approved | ReservationStatus::Rejected)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "rejected" => Ok(ReservationStatus::Rejected),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            _ => Err(format!("Invalid reservation status: {}", s)),
        }
    }
}

/// A booking of one room for one time slot on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    /// Room code, denormalized for listings and notifications
    pub room_code: String,
    pub requester_id: Uuid,
    /// Requester email, denormalized for listings and notifications
    pub requester_identity: String,
    pub date: NaiveDate,
    /// Opaque slot label such as `3-4`
    pub time_slot: String,
    pub reason: String,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new pending reservation
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        room_id: Uuid,
        room_code: String,
        requester_id: Uuid,
        requester_identity: String,
        date: NaiveDate,
        time_slot: String,
        reason: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            room_code,
            requester_id,
            requester_identity,
            date,
            time_slot,
            reason,
            status: ReservationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this reservation occupies the given slot
    pub fn occupies(&self, room_id: Uuid, date: NaiveDate, time_slot: &str) -> bool {
        self.status.is_active()
            && self.room_id == room_id
            && self.date == date
            && self.time_slot == time_slot
    }

    /// Whether `account_id` owns this reservation
    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.requester_id == account_id
    }
}

/// Public view of an occupied slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupiedSlot {
    pub date: NaiveDate,
    pub time_slot: String,
    pub status: ReservationStatus,
    pub requester_identity: String,
}

impl From<&Reservation> for OccupiedSlot {
    fn from(r: &Reservation) -> Self {
        Self {
            date: r.date,
            time_slot: r.time_slot.clone(),
            status: r.status,
            requester_identity: r.requester_identity.clone(),
        }
    }
}
