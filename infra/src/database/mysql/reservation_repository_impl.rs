//! MySQL implementation of the ReservationRepository trait.
//!
//! Slot exclusivity comes from the `uq_reservations_active_slot` unique index
//! over (room_id, date, time_slot, active_marker). `active_marker` is a
//! generated column that is NULL for rejected and cancelled rows, so a plain
//! INSERT either succeeds or fails with a duplicate key when an active
//! reservation already holds the slot.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;
use uuid::Uuid;

use cr_core::domain::entities::{Reservation, ReservationStatus};
use cr_core::errors::DomainError;
use cr_core::repositories::{InsertOutcome, ReservationFilter, ReservationRepository};

use super::{column, is_duplicate_key, query_error, uuid_column};

const RESERVATION_SELECT: &str = r#"
    SELECT r.id, r.room_id, rm.code AS room_code, r.requester_id,
           a.identity AS requester_identity, r.date, r.time_slot, r.reason,
           r.status, r.created_at, r.updated_at
    FROM reservations r
    JOIN rooms rm ON rm.id = r.room_id
    JOIN accounts a ON a.id = r.requester_id
"#;

pub struct MySqlReservationRepository {
    pool: MySqlPool,
}

impl MySqlReservationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_reservation(row: &MySqlRow) -> Result<Reservation, DomainError> {
        let status: String = column(row, "status")?;

        Ok(Reservation {
            id: uuid_column(row, "id")?,
            room_id: uuid_column(row, "room_id")?,
            room_code: column(row, "room_code")?,
            requester_id: uuid_column(row, "requester_id")?,
            requester_identity: column(row, "requester_identity")?,
            date: column::<NaiveDate>(row, "date")?,
            time_slot: column(row, "time_slot")?,
            reason: column(row, "reason")?,
            status: status.parse::<ReservationStatus>().map_err(DomainError::internal)?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }
}

/// WHERE clause for a listing filter; placeholders are bound in field order
fn list_conditions(filter: &ReservationFilter) -> String {
    let mut conditions = Vec::new();
    if filter.requester_id.is_some() {
        conditions.push("r.requester_id = ?");
    }
    if filter.status.is_some() {
        conditions.push("r.status = ?");
    }

    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

#[async_trait]
impl ReservationRepository for MySqlReservationRepository {
    async fn insert_if_slot_free(&self, reservation: Reservation) -> Result<InsertOutcome, DomainError> {
        let query = r#"
            INSERT INTO reservations (
                id, room_id, requester_id, date, time_slot, reason, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(reservation.id.to_string())
            .bind(reservation.room_id.to_string())
            .bind(reservation.requester_id.to_string())
            .bind(reservation.date)
            .bind(&reservation.time_slot)
            .bind(&reservation.reason)
            .bind(reservation.status.as_str())
            .bind(reservation.created_at)
            .bind(reservation.updated_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(reservation)),
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(
                    room_id = %reservation.room_id,
                    date = %reservation.date,
                    time_slot = %reservation.time_slot,
                    "Active reservation already holds the slot"
                );
                Ok(InsertOutcome::SlotTaken)
            }
            Err(e) => Err(query_error("Failed to insert reservation")(e)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, DomainError> {
        let query = format!("{} WHERE r.id = ? LIMIT 1", RESERVATION_SELECT);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find reservation"))?;

        row.as_ref().map(Self::row_to_reservation).transpose()
    }

    async fn find_active_in_slot(
        &self,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: &str,
    ) -> Result<Option<Reservation>, DomainError> {
        let query = format!(
            "{} WHERE r.room_id = ? AND r.date = ? AND r.time_slot = ? \
             AND r.status IN ('pending', 'approved') LIMIT 1",
            RESERVATION_SELECT
        );

        let row = sqlx::query(&query)
            .bind(room_id.to_string())
            .bind(date)
            .bind(time_slot)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to check slot"))?;

        row.as_ref().map(Self::row_to_reservation).transpose()
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        new_status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, DomainError> {
        let result = sqlx::query(
            "UPDATE reservations SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(new_status.as_str())
        .bind(now)
        .bind(id.to_string())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            // Reactivating a row whose slot was rebooked meanwhile
            Err(e) if is_duplicate_key(&e) => return Ok(None),
            Err(e) => return Err(query_error("Failed to update reservation status")(e)),
        };

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, DomainError> {
        let query = format!(
            "{} {} ORDER BY r.date DESC, r.created_at DESC LIMIT ?",
            RESERVATION_SELECT,
            list_conditions(filter)
        );

        let mut statement = sqlx::query(&query);
        if let Some(requester_id) = filter.requester_id {
            statement = statement.bind(requester_id.to_string());
        }
        if let Some(status) = filter.status {
            statement = statement.bind(status.as_str());
        }

        let rows = statement
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to list reservations"))?;

        rows.iter().map(Self::row_to_reservation).collect()
    }

    async fn list_active_for_room(
        &self,
        room_id: Uuid,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Reservation>, DomainError> {
        let query = format!(
            "{} WHERE r.room_id = ? AND r.date BETWEEN ? AND ? \
             AND r.status IN ('pending', 'approved') \
             ORDER BY r.date ASC, r.time_slot ASC",
            RESERVATION_SELECT
        );

        let rows = sqlx::query(&query)
            .bind(room_id.to_string())
            .bind(date_from)
            .bind(date_to)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to list occupied slots"))?;

        rows.iter().map(Self::row_to_reservation).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_conditions_for_own_reservations() {
        let filter = ReservationFilter {
            requester_id: Some(Uuid::new_v4()),
            status: Some(ReservationStatus::Pending),
            limit: 10,
        };
        assert_eq!(
            list_conditions(&filter),
            "WHERE r.requester_id = ? AND r.status = ?"
        );
    }

    #[test]
    fn test_list_conditions_for_everyone() {
        let filter = ReservationFilter {
            limit: 200,
            ..Default::default()
        };
        assert_eq!(list_conditions(&filter), "");
    }
}
