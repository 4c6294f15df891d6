//! Configuration for the reservation workflow

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Configuration for the reservation workflow
#[derive(Debug, Clone)]
pub struct ReservationConfig {
    /// Listing size when the caller gives none
    pub default_list_limit: u32,
    /// Lower bound of the listing size
    pub min_list_limit: u32,
    /// Upper bound of the listing size
    pub max_list_limit: u32,
    /// Days covered by an occupancy query without an end date
    pub occupancy_window_days: i64,
    /// Maximum reason length in characters
    pub reason_max_len: usize,
    /// Maximum time slot label length in characters
    pub time_slot_max_len: usize,
    /// Offset of campus local time from UTC, in minutes
    pub utc_offset_minutes: i32,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            default_list_limit: 200,
            min_list_limit: 1,
            max_list_limit: 500,
            occupancy_window_days: 14,
            reason_max_len: 200,
            time_slot_max_len: 20,
            utc_offset_minutes: 8 * 60,
        }
    }
}

impl ReservationConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            utc_offset_minutes: std::env::var("RESERVATION_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.utc_offset_minutes),
            occupancy_window_days: std::env::var("RESERVATION_OCCUPANCY_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.occupancy_window_days),
            ..defaults
        }
    }

    /// Clamp a requested listing size into the configured bounds
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_list_limit)
            .clamp(self.min_list_limit, self.max_list_limit)
    }

    /// Campus-local calendar date at `now`
    pub fn local_today(&self, now: DateTime<Utc>) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        now.with_timezone(&offset).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clamp_limit() {
        let config = ReservationConfig::default();
        assert_eq!(config.clamp_limit(None), 200);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(10_000)), 500);
        assert_eq!(config.clamp_limit(Some(42)), 42);
    }

    #[test]
    fn test_local_today_crosses_midnight() {
        let config = ReservationConfig::default();
        // 17:00 UTC is 01:00 the next day in UTC+8
        let now = Utc.with_ymd_and_hms(2025, 11, 29, 17, 0, 0).unwrap();
        assert_eq!(config.local_today(now), NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());
    }
}
