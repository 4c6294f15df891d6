//! MySQL implementation of the RoomCatalog trait.
//!
//! The initial catalog is seeded by migration; staff edits go through the
//! same table. Equipment is a JSON document in a TEXT column, so the
//! equipment filters read it with `JSON_EXTRACT`.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use cr_core::domain::entities::{Building, Room, RoomEquipment, RoomType};
use cr_core::errors::DomainError;
use cr_core::repositories::{RoomCatalog, RoomOrdering, RoomSearch, RoomSortKey};

use super::{column, is_duplicate_key, query_error, uuid_column};

const ROOM_COLUMNS: &str =
    "id, code, building, name, capacity, room_type, equipment, is_active, created_at";

pub struct MySqlRoomCatalog {
    pool: MySqlPool,
}

impl MySqlRoomCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_room(row: &MySqlRow) -> Result<Room, DomainError> {
        let building: String = column(row, "building")?;
        let room_type: String = column(row, "room_type")?;
        let equipment: String = column(row, "equipment")?;

        Ok(Room {
            id: uuid_column(row, "id")?,
            code: column(row, "code")?,
            building: building.parse::<Building>().map_err(DomainError::internal)?,
            name: column(row, "name")?,
            capacity: column(row, "capacity")?,
            room_type: room_type.parse::<RoomType>().unwrap_or_default(),
            equipment: parse_equipment(&equipment),
            is_active: column(row, "is_active")?,
            created_at: column(row, "created_at")?,
        })
    }
}

/// Equipment is display-only, so a malformed column falls back to defaults
fn parse_equipment(raw: &str) -> RoomEquipment {
    match serde_json::from_str(raw) {
        Ok(equipment) => equipment,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable room equipment, using defaults");
            RoomEquipment::default()
        }
    }
}

/// WHERE clause for a catalog search; binds follow in field order
fn search_conditions(search: &RoomSearch) -> String {
    let mut conditions = vec!["is_active = TRUE"];
    if search.building.is_some() {
        conditions.push("building = ?");
    }
    if search.keyword.is_some() {
        conditions.push("(code LIKE ? OR name LIKE ?)");
    }
    if search.min_capacity.is_some() {
        conditions.push("capacity >= ?");
    }
    for (wanted, condition) in [
        (search.has_projector, "JSON_EXTRACT(equipment, '$.has_projector') = CAST('true' AS JSON)"),
        (search.has_whiteboard, "JSON_EXTRACT(equipment, '$.has_whiteboard') = CAST('true' AS JSON)"),
        (search.has_mic, "JSON_EXTRACT(equipment, '$.has_mic') = CAST('true' AS JSON)"),
        (search.has_network, "JSON_EXTRACT(equipment, '$.has_network') = CAST('true' AS JSON)"),
    ] {
        if wanted {
            conditions.push(condition);
        }
    }
    format!("WHERE {}", conditions.join(" AND "))
}

fn order_clause(ordering: RoomOrdering) -> String {
    let direction = if ordering.descending { "DESC" } else { "ASC" };
    match ordering.key {
        RoomSortKey::Building => format!("ORDER BY building {}, code ASC", direction),
        RoomSortKey::Code => format!("ORDER BY code {}", direction),
        RoomSortKey::Capacity => format!("ORDER BY capacity {}, building ASC, code ASC", direction),
    }
}

/// `%keyword%` with LIKE wildcards taken literally
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn encode_equipment(equipment: &RoomEquipment) -> Result<String, DomainError> {
    serde_json::to_string(equipment)
        .map_err(|e| DomainError::internal(format!("Failed to encode room equipment: {}", e)))
}

#[async_trait]
impl RoomCatalog for MySqlRoomCatalog {
    async fn find_by_code(&self, code: &str) -> Result<Option<Room>, DomainError> {
        let query = format!("SELECT {} FROM rooms WHERE code = ? LIMIT 1", ROOM_COLUMNS);

        let row = sqlx::query(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("Failed to find room"))?;

        row.as_ref().map(Self::row_to_room).transpose()
    }

    async fn search(&self, search: &RoomSearch) -> Result<Vec<Room>, DomainError> {
        let query = format!(
            "SELECT {} FROM rooms {} {}",
            ROOM_COLUMNS,
            search_conditions(search),
            order_clause(search.ordering)
        );

        let mut statement = sqlx::query(&query);
        if let Some(building) = search.building {
            statement = statement.bind(building.as_str());
        }
        if let Some(keyword) = search.keyword.as_deref() {
            let pattern = like_pattern(keyword);
            statement = statement.bind(pattern.clone()).bind(pattern);
        }
        if let Some(min_capacity) = search.min_capacity {
            statement = statement.bind(min_capacity);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("Failed to search rooms"))?;

        rows.iter().map(Self::row_to_room).collect()
    }

    async fn insert(&self, room: Room) -> Result<bool, DomainError> {
        let query = format!(
            "INSERT INTO rooms ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ROOM_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(room.id.to_string())
            .bind(&room.code)
            .bind(room.building.as_str())
            .bind(&room.name)
            .bind(room.capacity)
            .bind(room.room_type.as_str())
            .bind(encode_equipment(&room.equipment)?)
            .bind(room.is_active)
            .bind(room.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(query_error("Failed to insert room")(e)),
        }
    }

    async fn update(&self, room: &Room) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE rooms SET building = ?, name = ?, capacity = ?, room_type = ?, equipment = ?, \
             is_active = ? WHERE id = ?",
        )
        .bind(room.building.as_str())
        .bind(&room.name)
        .bind(room.capacity)
        .bind(room.room_type.as_str())
        .bind(encode_equipment(&room.equipment)?)
        .bind(room.is_active)
        .bind(room.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(query_error("Failed to update room"))?;

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM rooms WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(query_error("Failed to delete room"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_equipment_reads_json() {
        let equipment = parse_equipment(
            r#"{"has_projector":true,"has_screen":true,"has_whiteboard":false,"has_network":true,
                "has_mic":false,"has_speaker":false,"has_teacher_computer":true,
                "student_computer_count":48,"has_air_conditioner":true,"has_fan":false,
                "power_socket_count":60,"wheelchair_accessible":true,"note":"lab"}"#,
        );
        assert!(equipment.has_projector);
        assert!(!equipment.has_whiteboard);
        assert_eq!(equipment.student_computer_count, 48);
        assert_eq!(equipment.note, "lab");
    }

    #[test]
    fn test_parse_equipment_falls_back_to_defaults() {
        assert_eq!(parse_equipment("{oops"), RoomEquipment::default());
    }

    #[test]
    fn test_search_conditions_follow_filters() {
        assert_eq!(search_conditions(&RoomSearch::default()), "WHERE is_active = TRUE");

        let clause = search_conditions(&RoomSearch {
            building: Some(Building::Ins),
            keyword: Some("lab".into()),
            has_mic: true,
            ..Default::default()
        });
        assert_eq!(clause.matches('?').count(), 3);
        assert!(clause.contains("'$.has_mic'"));
        assert!(!clause.contains("'$.has_projector'"));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("lab"), "%lab%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_order_clause() {
        let ordering = "-capacity".parse::<RoomOrdering>().unwrap();
        assert_eq!(order_clause(ordering), "ORDER BY capacity DESC, building ASC, code ASC");
        assert_eq!(order_clause(RoomOrdering::default()), "ORDER BY building ASC, code ASC");
    }
}
