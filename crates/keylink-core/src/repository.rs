use crate::error::Result;
use crate::key::{SecretKey, ShortKey};
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored URL record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Identity assigned by the storage backend.
    pub id: u64,
    /// The destination the short key redirects to.
    pub target_url: String,
    /// Public short key, unique across active and inactive records.
    pub key: ShortKey,
    /// Admin credential, unique across all records.
    pub secret_key: SecretKey,
    /// Whether the record is eligible for public resolution.
    pub is_active: bool,
    /// Number of successful public resolutions.
    pub clicks: u64,
    pub created_at: Timestamp,
    /// Last lifecycle mutation (creation or deactivation).
    pub updated_at: Timestamp,
}

/// A record that has not been persisted yet.
///
/// New records are always active with no clicks; the backend assigns the id.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub target_url: String,
    pub key: ShortKey,
    pub secret_key: SecretKey,
    pub created_at: Timestamp,
}

impl NewUrlRecord {
    /// Materializes the stored form of this record under the given id.
    pub fn into_record(self, id: u64) -> UrlRecord {
        UrlRecord {
            id,
            target_url: self.target_url,
            key: self.key,
            secret_key: self.secret_key,
            is_active: true,
            clicks: 0,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// The read side of the storage contract.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Point lookup by short key.
    ///
    /// With `active_only` set, deactivated records are treated as absent.
    async fn find_by_key(&self, key: &ShortKey, active_only: bool) -> Result<Option<UrlRecord>>;

    /// Point lookup by secret key, regardless of the active flag.
    async fn find_by_secret(&self, secret_key: &SecretKey) -> Result<Option<UrlRecord>>;

    /// Checks whether a key was ever issued, active or not.
    async fn key_exists(&self, key: &ShortKey) -> Result<bool> {
        Ok(self.find_by_key(key, false).await?.is_some())
    }
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Persists a new record and returns it with its assigned id.
    ///
    /// Returns `Err(StorageError::Conflict)` if the key or the secret key
    /// already exists.
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord>;

    /// Writes the lifecycle state (`is_active`, `updated_at`) of a record.
    ///
    /// The active flag can only be cleared: an update never reactivates a
    /// record. Returns `false` if no record has the given id.
    async fn update(&self, record: &UrlRecord) -> Result<bool>;

    /// Atomically adds one to the click counter of a record.
    async fn increment_clicks(&self, id: u64) -> Result<()>;
}
