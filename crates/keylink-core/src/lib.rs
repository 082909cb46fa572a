//! Core types and traits for the keylink URL shortener.
//!
//! This crate provides the record model, the storage contract and the
//! lifecycle manager trait shared by the generator, the storage backends,
//! the shortener service and the HTTP gateway.

pub mod error;
pub mod key;
pub mod manager;
pub mod repository;
pub mod validation;

pub use error::{ManagerError, StorageError};
pub use key::{SecretKey, ShortKey};
pub use manager::{AdminLookupPolicy, UrlManager};
pub use repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
pub use validation::{normalize_url, validate_url};
