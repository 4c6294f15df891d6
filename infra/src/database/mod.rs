//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and embedded migrations
//! - Repository implementations for the core traits

pub mod connection;
pub mod mysql;

pub use connection::DatabasePool;
pub use mysql::{
    MySqlAccountRepository, MySqlDenyListRepository, MySqlReservationRepository, MySqlRoomCatalog,
};
