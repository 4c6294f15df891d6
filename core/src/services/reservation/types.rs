//! Request types for the reservation workflow

use serde::Deserialize;

use chrono::{Datelike, NaiveDate};

use crate::domain::entities::reservation::ReservationStatus;

/// Calendar years a stored date may carry (the MySQL `DATE` range)
pub const MIN_BOOKING_YEAR: i32 = 1000;
pub const MAX_BOOKING_YEAR: i32 = 9999;

/// Whether `date` falls inside the storable year range
pub fn is_storable_date(date: NaiveDate) -> bool {
    (MIN_BOOKING_YEAR..=MAX_BOOKING_YEAR).contains(&date.year())
}

/// Raw booking request, validated by the workflow
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReservation {
    pub room_code: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time_slot: String,
    #[serde(default)]
    pub reason: String,
}

/// Listing options
#[derive(Debug, Clone, Default)]
pub struct ReservationListQuery {
    /// List everyone's reservations; only honoured for staff
    pub view_all: bool,
    pub status: Option<ReservationStatus>,
    pub limit: Option<u32>,
}
