//! Classroom entity and its closed enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Campus building a room belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Building {
    Ins,
    Ecg,
    Lib,
    Gh1,
    Gh2,
}

impl Building {
    /// Every building, in catalog order
    pub const ALL: [Building; 5] = [
        Building::Ins,
        Building::Ecg,
        Building::Lib,
        Building::Gh1,
        Building::Gh2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Building::Ins => "INS",
            Building::Ecg => "ECG",
            Building::Lib => "LIB",
            Building::Gh1 => "GH1",
            Building::Gh2 => "GH2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Building::Ins => "Computer Science Building",
            Building::Ecg => "Electrical and Computer Engineering Building",
            Building::Lib => "Library Building",
            Building::Gh1 => "General Classroom Building I",
            Building::Gh2 => "General Classroom Building II",
        }
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Building {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INS" => Ok(Building::Ins),
            "ECG" => Ok(Building::Ecg),
            "LIB" => Ok(Building::Lib),
            "GH1" => Ok(Building::Gh1),
            "GH2" => Ok(Building::Gh2),
            _ => Err(format!("Invalid building: {}", s)),
        }
    }
}

/// Kind of room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomType {
    #[default]
    Normal,
    Lab,
    Meeting,
    Lecture,
    Other,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Normal => "NORMAL",
            RoomType::Lab => "LAB",
            RoomType::Meeting => "MEETING",
            RoomType::Lecture => "LECTURE",
            RoomType::Other => "OTHER",
        }
    }
}

impl FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NORMAL" => Ok(RoomType::Normal),
            "LAB" => Ok(RoomType::Lab),
            "MEETING" => Ok(RoomType::Meeting),
            "LECTURE" => Ok(RoomType::Lecture),
            "OTHER" => Ok(RoomType::Other),
            _ => Err(format!("Invalid room type: {}", s)),
        }
    }
}

/// Equipment flags, used for display and catalog filters
///
/// Missing fields deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomEquipment {
    pub has_projector: bool,
    pub has_screen: bool,
    pub has_whiteboard: bool,
    pub has_network: bool,
    pub has_mic: bool,
    pub has_speaker: bool,
    pub has_teacher_computer: bool,
    pub student_computer_count: u32,
    pub has_air_conditioner: bool,
    pub has_fan: bool,
    pub power_socket_count: u32,
    pub wheelchair_accessible: bool,
    pub note: String,
}

impl Default for RoomEquipment {
    fn default() -> Self {
        Self {
            has_projector: false,
            has_screen: false,
            has_whiteboard: true,
            has_network: true,
            has_mic: false,
            has_speaker: false,
            has_teacher_computer: false,
            student_computer_count: 0,
            has_air_conditioner: true,
            has_fan: false,
            power_socket_count: 0,
            wheelchair_accessible: false,
            note: String::new(),
        }
    }
}

/// A bookable classroom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    /// Unique room code, e.g. `INS201`
    pub code: String,
    pub building: Building,
    pub name: String,
    pub capacity: u32,
    pub room_type: RoomType,
    pub equipment: RoomEquipment,
    /// Inactive rooms are hidden from the catalog and cannot be booked
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Creates an active room with default equipment
    pub fn new(code: impl Into<String>, building: Building, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            building,
            name: name.into(),
            capacity,
            room_type: RoomType::default(),
            equipment: RoomEquipment::default(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn with_room_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    pub fn with_equipment(mut self, equipment: RoomEquipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}
