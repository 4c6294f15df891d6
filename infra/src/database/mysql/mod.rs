//! MySQL repository implementations

pub mod account_repository_impl;
pub mod deny_list_repository_impl;
pub mod reservation_repository_impl;
pub mod room_catalog_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use deny_list_repository_impl::MySqlDenyListRepository;
pub use reservation_repository_impl::MySqlReservationRepository;
pub use room_catalog_impl::MySqlRoomCatalog;

use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

use cr_core::errors::DomainError;

/// Read one column, mapping decode failures to an internal error
pub(crate) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(name).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    })
}

/// Read a CHAR(36) column as a UUID
pub(crate) fn uuid_column(row: &MySqlRow, name: &str) -> Result<Uuid, DomainError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", name, e),
    })
}

/// Map a query failure to an internal error with context
pub(crate) fn query_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

/// Whether the error is a unique key violation (MySQL 1062)
pub(crate) fn is_duplicate_key(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_duplicates() {
        assert!(!is_duplicate_key(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate_key(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_query_error_keeps_context() {
        let error = query_error("Failed to list rooms")(sqlx::Error::PoolClosed);
        assert!(matches!(
            error,
            DomainError::Internal { ref message } if message.starts_with("Failed to list rooms: ")
        ));
    }
}
