//! Room service: catalog reads for everyone, writes for staff

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::room::{Building, Room};
use crate::domain::value_objects::Principal;
use crate::errors::{DomainError, DomainResult, ReservationError, RoomError};
use crate::repositories::{RoomCatalog, RoomSearch};
use crate::services::clock::Clock;

use super::types::{validate_code, BuildingSummary, CatalogStats, RoomDraft};

pub struct RoomService<C: ?Sized> {
    rooms: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> RoomService<C>
where
    C: RoomCatalog + ?Sized,
{
    pub fn new(rooms: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { rooms, clock }
    }

    /// Active rooms matching `search`
    pub async fn search(&self, search: &RoomSearch) -> DomainResult<Vec<Room>> {
        self.rooms.search(search).await
    }

    /// An active room by code
    pub async fn find(&self, code: &str) -> DomainResult<Option<Room>> {
        Ok(self
            .rooms
            .find_by_code(code.trim())
            .await?
            .filter(|r| r.is_active))
    }

    /// Buildings that have at least one active room, in catalog order
    pub async fn buildings(&self) -> DomainResult<Vec<BuildingSummary>> {
        let mut counts: HashMap<Building, usize> = HashMap::new();
        for room in self.rooms.search(&RoomSearch::default()).await? {
            *counts.entry(room.building).or_default() += 1;
        }

        Ok(Building::ALL
            .into_iter()
            .filter_map(|building| {
                counts.get(&building).map(|&classroom_count| BuildingSummary {
                    code: building,
                    name: building.display_name(),
                    classroom_count,
                })
            })
            .collect())
    }

    pub async fn stats(&self) -> DomainResult<CatalogStats> {
        let rooms = self.rooms.search(&RoomSearch::default()).await?;
        Ok(CatalogStats::from_rooms(&rooms))
    }

    /// Add a room to the catalog (staff only)
    pub async fn create(&self, caller: &Principal, code: &str, draft: RoomDraft) -> DomainResult<Room> {
        require_staff(caller)?;

        let code = code.trim();
        validate_code(code)?;
        draft.validate()?;

        let mut room = Room::new(code, draft.building, "", draft.capacity);
        room.created_at = self.clock.now();
        draft.apply(&mut room);

        if !self.rooms.insert(room.clone()).await? {
            return Err(RoomError::CodeTaken {
                room_code: code.to_string(),
            }
            .into());
        }

        tracing::info!(
            room_code = %room.code,
            staff_id = %caller.account_id,
            event = "room_created",
            "Room added to catalog"
        );
        Ok(room)
    }

    /// Replace every attribute of a room except its code (staff only)
    ///
    /// Inactive rooms can be updated too, which is how they are reopened.
    pub async fn update(&self, caller: &Principal, code: &str, draft: RoomDraft) -> DomainResult<Room> {
        require_staff(caller)?;
        draft.validate()?;

        let mut room = self.require_room(code).await?;
        draft.apply(&mut room);
        self.rooms.update(&room).await?;

        tracing::info!(
            room_code = %room.code,
            staff_id = %caller.account_id,
            is_active = room.is_active,
            event = "room_updated",
            "Room updated"
        );
        Ok(room)
    }

    /// Remove a room and its reservations (staff only)
    pub async fn delete(&self, caller: &Principal, code: &str) -> DomainResult<()> {
        require_staff(caller)?;

        let code = code.trim();
        if !self.rooms.delete(code).await? {
            return Err(room_not_found(code));
        }

        tracing::info!(
            room_code = %code,
            staff_id = %caller.account_id,
            event = "room_deleted",
            "Room removed from catalog"
        );
        Ok(())
    }

    async fn require_room(&self, code: &str) -> DomainResult<Room> {
        let code = code.trim();
        self.rooms
            .find_by_code(code)
            .await?
            .ok_or_else(|| room_not_found(code))
    }
}

fn require_staff(caller: &Principal) -> DomainResult<()> {
    if caller.is_staff {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

fn room_not_found(code: &str) -> DomainError {
    ReservationError::RoomNotFound {
        room_code: code.to_string(),
    }
    .into()
}
