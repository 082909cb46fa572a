use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use keylink_core::error::{Result, StorageError};
use keylink_core::key::{SecretKey, ShortKey};
use keylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// In-memory implementation of the repository contract using DashMap.
///
/// Records are stored by id with two unique indexes (short key and secret
/// key) pointing at them. Locks are always taken in the order
/// `keys` -> `secrets` -> `records`, and readers never hold an index guard
/// while touching `records`.
#[derive(Debug)]
pub struct InMemoryRepository {
    records: DashMap<u64, UrlRecord>,
    keys: DashMap<String, u64>,
    secrets: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
            keys: DashMap::with_capacity(capacity),
            secrets: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records, active or not.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn get_by_id(&self, id: u64) -> Option<UrlRecord> {
        self.records.get(&id).map(|record| record.clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_key(&self, key: &ShortKey, active_only: bool) -> Result<Option<UrlRecord>> {
        let Some(id) = self.keys.get(key.as_str()).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self
            .get_by_id(id)
            .filter(|record| !active_only || record.is_active))
    }

    async fn find_by_secret(&self, secret_key: &SecretKey) -> Result<Option<UrlRecord>> {
        let Some(id) = self.secrets.get(secret_key.as_str()).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self.get_by_id(id))
    }

    async fn key_exists(&self, key: &ShortKey) -> Result<bool> {
        Ok(self.keys.contains_key(key.as_str()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        // Both index entries stay locked until the record is visible, so two
        // concurrent inserts of the same key cannot both succeed.
        let key_slot = match self.keys.entry(record.key.as_str().to_owned()) {
            Entry::Occupied(_) => return Err(StorageError::Conflict(record.key.to_string())),
            Entry::Vacant(slot) => slot,
        };
        let secret_slot = match self.secrets.entry(record.secret_key.as_str().to_owned()) {
            Entry::Occupied(_) => {
                return Err(StorageError::Conflict(format!(
                    "secret key for {}",
                    record.key
                )))
            }
            Entry::Vacant(slot) => slot,
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = record.into_record(id);
        self.records.insert(id, stored.clone());
        secret_slot.insert(id);
        key_slot.insert(id);

        trace!(id, key = %stored.key, "inserted record");
        Ok(stored)
    }

    async fn update(&self, record: &UrlRecord) -> Result<bool> {
        let Some(mut stored) = self.records.get_mut(&record.id) else {
            return Ok(false);
        };

        // Deactivation is one-way.
        stored.is_active &= record.is_active;
        stored.updated_at = record.updated_at;
        Ok(true)
    }

    async fn increment_clicks(&self, id: u64) -> Result<()> {
        let Some(mut stored) = self.records.get_mut(&id) else {
            return Err(StorageError::Operation(format!("no record with id {id}")));
        };

        stored.clicks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn new_record(key: &str, suffix: &str, url: &str) -> NewUrlRecord {
        let key = ShortKey::new(key);
        NewUrlRecord {
            target_url: url.to_string(),
            secret_key: SecretKey::derive(&key, suffix),
            key,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_key() {
        let repo = InMemoryRepository::new();

        let inserted = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();

        assert!(inserted.is_active);
        assert_eq!(inserted.clicks, 0);

        let found = repo
            .find_by_key(&ShortKey::new("ABC12"), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, inserted);
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let repo = InMemoryRepository::new();

        let first = repo
            .insert(new_record("AAAAA", "SECRET01", "https://one.example"))
            .await
            .unwrap();
        let second = repo
            .insert(new_record("BBBBB", "SECRET02", "https://two.example"))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn find_by_key_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.find_by_key(&ShortKey::new("NOPE0"), false).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict_on_key() {
        let repo = InMemoryRepository::new();

        repo.insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();

        let err = repo
            .insert(new_record("ABC12", "SECRET02", "https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn insert_conflict_on_secret_leaves_no_trace() {
        let repo = InMemoryRepository::new();

        let existing = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();

        let clash = NewUrlRecord {
            target_url: "https://other.com".to_string(),
            key: ShortKey::new("ZZZ99"),
            secret_key: existing.secret_key.clone(),
            created_at: Timestamp::now(),
        };
        let err = repo.insert(clash).await.unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        assert!(!repo.key_exists(&ShortKey::new("ZZZ99")).await.unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_by_secret_ignores_active_flag() {
        let repo = InMemoryRepository::new();

        let mut record = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();
        record.is_active = false;
        assert!(repo.update(&record).await.unwrap());

        let found = repo
            .find_by_secret(&record.secret_key)
            .await
            .unwrap()
            .unwrap();
        assert!(!found.is_active);
    }

    #[tokio::test]
    async fn active_only_hides_deactivated_records() {
        let repo = InMemoryRepository::new();

        let mut record = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();
        record.is_active = false;
        repo.update(&record).await.unwrap();

        let key = ShortKey::new("ABC12");
        assert!(repo.find_by_key(&key, true).await.unwrap().is_none());
        assert!(repo.find_by_key(&key, false).await.unwrap().is_some());
        assert!(repo.key_exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn update_never_reactivates() {
        let repo = InMemoryRepository::new();

        let mut record = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();
        record.is_active = false;
        repo.update(&record).await.unwrap();

        record.is_active = true;
        repo.update(&record).await.unwrap();

        let found = repo
            .find_by_key(&record.key, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!found.is_active);
    }

    #[tokio::test]
    async fn update_unknown_id() {
        let repo = InMemoryRepository::new();
        let record = new_record("ABC12", "SECRET01", "https://example.com").into_record(42);

        assert!(!repo.update(&record).await.unwrap());
    }

    #[tokio::test]
    async fn increment_clicks_counts_each_call() {
        let repo = InMemoryRepository::new();

        let record = repo
            .insert(new_record("ABC12", "SECRET01", "https://example.com"))
            .await
            .unwrap();
        repo.increment_clicks(record.id).await.unwrap();
        repo.increment_clicks(record.id).await.unwrap();

        let found = repo
            .find_by_key(&record.key, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.clicks, 2);
    }

    #[tokio::test]
    async fn increment_clicks_unknown_id() {
        let repo = InMemoryRepository::new();

        let err = repo.increment_clicks(7).await.unwrap_err();
        assert!(matches!(err, StorageError::Operation(_)));
    }

    #[tokio::test]
    async fn concurrent_access() {
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let record = repo
            .insert(new_record("HOT00", "SECRET00", "https://hot.example"))
            .await
            .unwrap();
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let key = format!("K{:04}", i);
                repo.insert(new_record(&key, "SECRET01", &format!("https://example{}.com", i)))
                    .await
                    .unwrap();
            }));
        }

        for _ in 0..50 {
            let repo = Arc::clone(&repo);
            let id = record.id;
            handles.push(tokio::spawn(async move {
                repo.increment_clicks(id).await.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let key = ShortKey::new(format!("K{:04}", i));
            let found = repo.find_by_key(&key, true).await.unwrap().unwrap();
            assert_eq!(found.target_url, format!("https://example{}.com", i));
        }

        let hot = repo.find_by_key(&record.key, true).await.unwrap().unwrap();
        assert_eq!(hot.clicks, 50);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_key_admit_one() {
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(new_record("SAME0", &format!("S{:07}", i), "https://example.com"))
                    .await
                    .is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
        assert_eq!(repo.len(), 1);
    }
}
