//! Deny-list administration

mod service;

pub use service::{AccountPartition, AccountSummary, DenyListService};
