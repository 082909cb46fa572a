//! Storage backends for URL records.
//!
//! Both backends enforce uniqueness of the short key and the secret key
//! themselves; callers treat [`StorageError::Conflict`] as a signal to
//! generate a new key.

pub mod memory;
pub mod mysql;

pub use keylink_core::error::{Result, StorageError};
pub use keylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
