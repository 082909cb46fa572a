//! Record lifecycle management for shortened URLs.
//!
//! [`RecordManager`] creates records with a fresh unique key and a derived
//! secret key, resolves public keys (counting clicks), and serves the admin
//! path guarded by the secret key. Core types are re-exported from
//! `keylink_core`.

pub mod service;
pub mod settings;

pub use keylink_core::{AdminLookupPolicy, ManagerError, UrlManager, UrlRecord};
pub use service::RecordManager;
pub use settings::ManagerSettings;
