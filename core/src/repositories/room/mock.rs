//! In-memory room catalog

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::room::Room;
use crate::errors::DomainError;

use super::r#trait::{RoomCatalog, RoomSearch};

/// Mock room catalog keyed by room code
#[derive(Clone, Default)]
pub struct MockRoomCatalog {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
}

impl MockRoomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let map = rooms.into_iter().map(|r| (r.code.clone(), r)).collect();
        Self {
            rooms: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl RoomCatalog for MockRoomCatalog {
    async fn find_by_code(&self, code: &str) -> Result<Option<Room>, DomainError> {
        Ok(self.rooms.read().await.get(code).cloned())
    }

    async fn search(&self, search: &RoomSearch) -> Result<Vec<Room>, DomainError> {
        let rooms = self.rooms.read().await;
        let mut found: Vec<Room> = rooms.values().filter(|r| search.matches(r)).cloned().collect();
        found.sort_by(|a, b| search.ordering.compare(a, b));
        Ok(found)
    }

    async fn insert(&self, room: Room) -> Result<bool, DomainError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.code) {
            return Ok(false);
        }
        rooms.insert(room.code.clone(), room);
        Ok(true)
    }

    async fn update(&self, room: &Room) -> Result<(), DomainError> {
        let mut rooms = self.rooms.write().await;
        if let Some(stored) = rooms.values_mut().find(|r| r.id == room.id) {
            *stored = room.clone();
        }
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, DomainError> {
        Ok(self.rooms.write().await.remove(code).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::room::Building;
    use crate::repositories::room::RoomOrdering;

    #[tokio::test]
    async fn test_search_filters_and_orders() {
        let catalog = MockRoomCatalog::with_rooms([
            Room::new("LIB101", Building::Lib, "Library 101", 20),
            Room::new("INS202", Building::Ins, "INS 202", 40),
            Room::new("INS201", Building::Ins, "INS 201", 60),
            Room::new("INS999", Building::Ins, "Closed", 10).deactivated(),
        ]);

        let all = catalog.search(&RoomSearch::default()).await.unwrap();
        let codes: Vec<&str> = all.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["INS201", "INS202", "LIB101"]);

        let ins = catalog
            .search(&RoomSearch {
                building: Some(Building::Ins),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ins.len(), 2);

        let by_capacity = catalog
            .search(&RoomSearch {
                ordering: "-capacity".parse::<RoomOrdering>().unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();
        let codes: Vec<&str> = by_capacity.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["INS201", "INS202", "LIB101"]);

        assert!(catalog.find_by_code("INS999").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_insert_update_delete() {
        let catalog = MockRoomCatalog::new();
        let room = Room::new("GH1-101", Building::Gh1, "GH1 101", 30);

        assert!(catalog.insert(room.clone()).await.unwrap());
        assert!(!catalog.insert(Room::new("GH1-101", Building::Gh1, "Twin", 10)).await.unwrap());

        let mut renamed = room.clone();
        renamed.name = "Seminar room".into();
        catalog.update(&renamed).await.unwrap();
        assert_eq!(catalog.find_by_code("GH1-101").await.unwrap().unwrap().name, "Seminar room");

        assert!(catalog.delete("GH1-101").await.unwrap());
        assert!(!catalog.delete("GH1-101").await.unwrap());
    }
}
