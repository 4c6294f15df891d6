//! Room catalog: public search and summaries, staff administration

mod service;
mod types;

pub use service::RoomService;
pub use types::{BuildingSummary, CatalogStats, EquipmentCounts, RoomDraft, ROOM_CODE_MAX_LEN, ROOM_NAME_MAX_LEN};
