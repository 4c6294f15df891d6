//! Room administration input and catalog summaries

use serde::Serialize;

use crate::domain::entities::room::{Building, Room, RoomEquipment, RoomType};
use crate::errors::RoomError;

pub const ROOM_CODE_MAX_LEN: usize = 20;
pub const ROOM_NAME_MAX_LEN: usize = 50;
const EQUIPMENT_NOTE_MAX_LEN: usize = 500;

/// Every editable room attribute except the code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub building: Building,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub equipment: RoomEquipment,
    pub is_active: bool,
}

impl RoomDraft {
    pub(super) fn validate(&self) -> Result<(), RoomError> {
        if self.name.trim().chars().count() > ROOM_NAME_MAX_LEN {
            return Err(invalid("name", format!("at most {} characters", ROOM_NAME_MAX_LEN)));
        }
        if self.capacity == 0 {
            return Err(invalid("capacity", "must be at least 1"));
        }
        if self.equipment.note.chars().count() > EQUIPMENT_NOTE_MAX_LEN {
            return Err(invalid("equipment_note", format!("at most {} characters", EQUIPMENT_NOTE_MAX_LEN)));
        }
        Ok(())
    }

    /// Copy the draft onto `room`, keeping its id, code and creation time
    pub(super) fn apply(self, room: &mut Room) {
        room.building = self.building;
        room.name = self.name.trim().to_string();
        room.capacity = self.capacity;
        room.room_type = self.room_type;
        room.equipment = self.equipment;
        room.is_active = self.is_active;
    }
}

pub(super) fn validate_code(code: &str) -> Result<(), RoomError> {
    if code.is_empty() {
        return Err(invalid("code", "must not be empty"));
    }
    if code.chars().count() > ROOM_CODE_MAX_LEN {
        return Err(invalid("code", format!("at most {} characters", ROOM_CODE_MAX_LEN)));
    }
    if code.chars().any(char::is_whitespace) {
        return Err(invalid("code", "must not contain whitespace"));
    }
    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> RoomError {
    RoomError::InvalidField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Active room count of one building
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingSummary {
    pub code: Building,
    pub name: &'static str,
    pub classroom_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EquipmentCounts {
    pub has_projector: usize,
    pub has_whiteboard: usize,
    pub has_mic: usize,
}

/// Totals over the active catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_classrooms: usize,
    pub total_capacity: u64,
    /// Mean capacity, truncated
    pub avg_capacity: u64,
    pub buildings_count: usize,
    pub equipment_stats: EquipmentCounts,
}

impl CatalogStats {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        let total_capacity: u64 = rooms.iter().map(|r| u64::from(r.capacity)).sum();
        let avg_capacity = match rooms.len() {
            0 => 0,
            n => total_capacity / n as u64,
        };

        let mut buildings: Vec<Building> = rooms.iter().map(|r| r.building).collect();
        buildings.sort_by_key(|b| b.as_str());
        buildings.dedup();

        Self {
            total_classrooms: rooms.len(),
            total_capacity,
            avg_capacity,
            buildings_count: buildings.len(),
            equipment_stats: EquipmentCounts {
                has_projector: rooms.iter().filter(|r| r.equipment.has_projector).count(),
                has_whiteboard: rooms.iter().filter(|r| r.equipment.has_whiteboard).count(),
                has_mic: rooms.iter().filter(|r| r.equipment.has_mic).count(),
            },
        }
    }
}
