//! Room catalog repository.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::entities::room::{Building, Room};
use crate::errors::DomainError;

/// Field a room listing is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomSortKey {
    /// Building, then code
    #[default]
    Building,
    Code,
    Capacity,
}

/// Sort order of a room listing
///
/// Parsed from `building`, `room_code` or `capacity`, with a leading `-`
/// for descending order. Ties always fall back to (building, code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomOrdering {
    pub key: RoomSortKey,
    pub descending: bool,
}

impl RoomOrdering {
    pub fn compare(&self, a: &Room, b: &Room) -> Ordering {
        let primary = match self.key {
            RoomSortKey::Building => a.building.as_str().cmp(b.building.as_str()),
            RoomSortKey::Code => a.code.cmp(&b.code),
            RoomSortKey::Capacity => a.capacity.cmp(&b.capacity),
        };
        let primary = if self.descending { primary.reverse() } else { primary };

        primary
            .then_with(|| a.building.as_str().cmp(b.building.as_str()))
            .then_with(|| a.code.cmp(&b.code))
    }
}

impl FromStr for RoomOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, field) = match s.strip_prefix('-') {
            Some(field) => (true, field),
            None => (false, s),
        };
        let key = match field {
            "building" => RoomSortKey::Building,
            "room_code" | "code" => RoomSortKey::Code,
            "capacity" => RoomSortKey::Capacity,
            _ => return Err(format!("Invalid ordering: {}", s)),
        };
        Ok(Self { key, descending })
    }
}

/// Catalog search over active rooms
///
/// Equipment flags only narrow the result when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSearch {
    pub building: Option<Building>,
    /// Case-insensitive substring of the code or the name
    pub keyword: Option<String>,
    pub min_capacity: Option<u32>,
    pub has_projector: bool,
    pub has_whiteboard: bool,
    pub has_mic: bool,
    pub has_network: bool,
    pub ordering: RoomOrdering,
}

impl RoomSearch {
    /// Whether `room` passes every filter, activity included
    pub fn matches(&self, room: &Room) -> bool {
        if !room.is_active {
            return false;
        }
        if self.building.is_some_and(|b| room.building != b) {
            return false;
        }
        if self.min_capacity.is_some_and(|min| room.capacity < min) {
            return false;
        }
        if let Some(keyword) = self.keyword.as_deref() {
            let keyword = keyword.to_lowercase();
            if !room.code.to_lowercase().contains(&keyword)
                && !room.name.to_lowercase().contains(&keyword)
            {
                return false;
            }
        }

        let equipment = &room.equipment;
        (!self.has_projector || equipment.has_projector)
            && (!self.has_whiteboard || equipment.has_whiteboard)
            && (!self.has_mic || equipment.has_mic)
            && (!self.has_network || equipment.has_network)
    }
}

/// Repository trait for the room catalog
#[async_trait]
pub trait RoomCatalog: Send + Sync {
    /// Find a room by its unique code, active or not
    async fn find_by_code(&self, code: &str) -> Result<Option<Room>, DomainError>;

    /// Active rooms matching `search`, in its order
    async fn search(&self, search: &RoomSearch) -> Result<Vec<Room>, DomainError>;

    /// Add a room; `false` when the code is taken
    async fn insert(&self, room: Room) -> Result<bool, DomainError>;

    /// Overwrite every attribute of the room with the same id
    async fn update(&self, room: &Room) -> Result<(), DomainError>;

    /// Remove a room and, through the store, its reservations; `false` when absent
    async fn delete(&self, code: &str) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::room::RoomEquipment;

    #[test]
    fn test_ordering_parse() {
        assert_eq!("capacity".parse::<RoomOrdering>().unwrap().key, RoomSortKey::Capacity);
        let desc = "-room_code".parse::<RoomOrdering>().unwrap();
        assert_eq!(desc.key, RoomSortKey::Code);
        assert!(desc.descending);
        assert!("-name".parse::<RoomOrdering>().is_err());
    }

    #[test]
    fn test_search_filters() {
        let lab = Room::new("INS105", Building::Ins, "Computer Lab 105", 50).with_equipment(RoomEquipment {
            has_projector: true,
            has_mic: true,
            ..Default::default()
        });

        assert!(RoomSearch::default().matches(&lab));
        assert!(RoomSearch {
            keyword: Some("lab".into()),
            has_projector: true,
            min_capacity: Some(50),
            ..Default::default()
        }
        .matches(&lab));
        assert!(!RoomSearch {
            min_capacity: Some(51),
            ..Default::default()
        }
        .matches(&lab));
        assert!(!RoomSearch {
            building: Some(Building::Ecg),
            ..Default::default()
        }
        .matches(&lab));
        assert!(!RoomSearch::default().matches(&lab.clone().deactivated()));
    }
}
