//! Deny-list repository module.

mod r#trait;
pub use r#trait::DenyListRepository;

mod mock;
pub use mock::MockDenyListRepository;
