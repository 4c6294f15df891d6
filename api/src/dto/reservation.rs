//! Reservation request and query types
//!
//! Query strings arrive as raw strings and are parsed here so a bad value
//! maps to a 400 with a specific error code rather than a generic extractor
//! failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cr_core::domain::ReservationStatus;
use cr_core::services::{is_storable_date, NewReservation, ReservationListQuery};
use cr_shared::error_codes;

use crate::handlers::ApiError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    #[serde(default, alias = "classroom")]
    pub room_code: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time_slot: String,
    #[serde(default)]
    pub reason: String,
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(request: CreateReservationRequest) -> Self {
        NewReservation {
            room_code: request.room_code,
            date: request.date,
            time_slot: request.time_slot,
            reason: request.reason,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListReservationsParams {
    pub view_all: Option<String>,
    pub status: Option<String>,
    pub limit: Option<String>,
}

impl ListReservationsParams {
    /// An unknown status is rejected; an unparsable limit falls back to the default
    pub fn into_query(self) -> Result<ReservationListQuery, ApiError> {
        let view_all = matches!(
            self.view_all.as_deref().map(str::trim),
            Some("true") | Some("1")
        );

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_status(raw)?),
        };

        let limit = self.limit.and_then(|raw| raw.trim().parse::<u32>().ok());

        Ok(ReservationListQuery {
            view_all,
            status,
            limit,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

impl StatusUpdateRequest {
    pub fn parse(&self) -> Result<ReservationStatus, ApiError> {
        parse_status(self.status.trim())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OccupiedParams {
    #[serde(alias = "room_code")]
    pub classroom: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Parsed occupancy query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedQuery {
    pub room_code: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl OccupiedParams {
    pub fn parse(self) -> Result<OccupiedQuery, ApiError> {
        let room_code = self
            .classroom
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::bad_request(error_codes::MISSING_FIELD, "classroom is required"))?;

        Ok(OccupiedQuery {
            room_code,
            date_from: parse_optional_date(self.date_from)?,
            date_to: parse_optional_date(self.date_to)?,
        })
    }
}

fn parse_status(raw: &str) -> Result<ReservationStatus, ApiError> {
    raw.parse::<ReservationStatus>()
        .map_err(|e| ApiError::bad_request(error_codes::BAD_REQUEST, e))
}

fn parse_optional_date(raw: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .filter(|date| is_storable_date(*date))
            .map(Some)
            .ok_or_else(|| {
                ApiError::bad_request(
                    error_codes::INVALID_DATE,
                    format!("Invalid date: {} (expected YYYY-MM-DD)", value),
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params() {
        let query = ListReservationsParams {
            view_all: Some("1".into()),
            status: Some("approved".into()),
            limit: Some("abc".into()),
        }
        .into_query()
        .unwrap();

        assert!(query.view_all);
        assert_eq!(query.status, Some(ReservationStatus::Approved));
        assert_eq!(query.limit, None);

        let query = ListReservationsParams {
            view_all: Some("yes".into()),
            ..Default::default()
        }
        .into_query()
        .unwrap();
        assert!(!query.view_all);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = ListReservationsParams {
            status: Some("archived".into()),
            ..Default::default()
        }
        .into_query();
        assert!(matches!(result, Err(ApiError::BadRequest { .. })));
    }

    #[test]
    fn test_occupied_params() {
        let query = OccupiedParams {
            classroom: Some(" INS201 ".into()),
            date_from: Some("2025-11-30".into()),
            date_to: None,
        }
        .parse()
        .unwrap();
        assert_eq!(query.room_code, "INS201");
        assert_eq!(query.date_from, NaiveDate::from_ymd_opt(2025, 11, 30));

        assert!(OccupiedParams::default().parse().is_err());

        let bad_date = OccupiedParams {
            classroom: Some("INS201".into()),
            date_from: Some("30/11/2025".into()),
            date_to: None,
        }
        .parse();
        assert!(matches!(
            bad_date,
            Err(ApiError::BadRequest { code: "INVALID_DATE", .. })
        ));
    }

    #[test]
    fn test_occupied_params_reject_out_of_range_years() {
        for raw in ["+262142-12-31", "0999-01-01", "10000-01-01"] {
            let result = OccupiedParams {
                classroom: Some("INS201".into()),
                date_from: Some(raw.into()),
                date_to: Some(raw.into()),
            }
            .parse();
            assert!(
                matches!(result, Err(ApiError::BadRequest { code: "INVALID_DATE", .. })),
                "{} should be rejected",
                raw
            );
        }
    }
}
