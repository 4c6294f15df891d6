//! Room catalog module.

mod r#trait;
pub use r#trait::{RoomCatalog, RoomOrdering, RoomSearch, RoomSortKey};

mod mock;
pub use mock::MockRoomCatalog;
