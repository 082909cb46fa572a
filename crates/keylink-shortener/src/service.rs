use crate::settings::ManagerSettings;
use async_trait::async_trait;
use jiff::Timestamp;
use keylink_core::{
    normalize_url, ManagerError, NewUrlRecord, Repository, SecretKey, ShortKey, StorageError,
    UrlManager, UrlRecord,
};
use keylink_generator::{generate_key, generate_unique_key, Generator, GeneratorError};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

type Result<T> = std::result::Result<T, ManagerError>;

/// A concrete implementation of the [`UrlManager`] trait.
///
/// The manager wraps a [`Repository`] and a [`Generator`] and handles:
/// - URL validation before any key is drawn
/// - unique key allocation and secret key derivation
/// - regeneration when the storage uniqueness constraint rejects an insert
/// - click counting on public resolution
/// - the admin lookup policy for secret keys
#[derive(Debug)]
pub struct RecordManager<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ManagerSettings,
}

impl<R, G> Clone for RecordManager<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            settings: self.settings.clone(),
        }
    }
}

impl<R: Repository, G: Generator> RecordManager<R, G> {
    /// Creates a manager with default settings.
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_settings(repository, generator, ManagerSettings::default())
    }

    pub fn with_settings(repository: R, generator: G, settings: ManagerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Allocates a key that was never issued and binds a fresh secret to it.
    async fn allocate_keys(&self) -> Result<(ShortKey, SecretKey)> {
        let key = generate_unique_key(
            self.generator.as_ref(),
            self.repository.as_ref(),
            self.settings.max_key_attempts,
        )
        .await
        .map_err(generator_to_manager_error)?;

        let suffix = generate_key(self.settings.secret_suffix_length);
        let secret_key = SecretKey::derive(&key, &suffix);
        Ok((key, secret_key))
    }

    /// Secret key lookup filtered by the configured admin policy.
    async fn find_for_admin(&self, secret_key: &SecretKey) -> Result<UrlRecord> {
        self.repository
            .find_by_secret(secret_key)
            .await?
            .filter(|record| self.settings.admin_lookup.admits(record.is_active))
            .ok_or_else(|| ManagerError::NotFound(secret_key.to_string()))
    }
}

#[async_trait]
impl<R: Repository, G: Generator> UrlManager for RecordManager<R, G> {
    async fn create(&self, target_url: &str) -> Result<UrlRecord> {
        let Some(target_url) = normalize_url(target_url) else {
            debug!(target_url, "rejected malformed target url");
            return Err(ManagerError::InvalidUrl(target_url.to_string()));
        };

        let attempts = self.settings.max_insert_attempts;
        for attempt in 1..=attempts {
            let (key, secret_key) = self.allocate_keys().await?;
            let record = NewUrlRecord {
                target_url: target_url.clone(),
                key,
                secret_key,
                created_at: Timestamp::now(),
            };

            match self.repository.insert(record).await {
                Ok(stored) => {
                    info!(id = stored.id, key = %stored.key, "created shortened url");
                    return Ok(stored);
                }
                // Another creator took the key between the check and the insert.
                Err(StorageError::Conflict(taken)) => {
                    warn!(attempt, key = %taken, "insert hit a uniqueness conflict, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(attempts, "giving up after repeated key conflicts");
        Err(ManagerError::KeySpaceExhausted { attempts })
    }

    async fn resolve(&self, key: &ShortKey) -> Result<UrlRecord> {
        trace!(key = %key, "resolving short key");

        let Some(mut record) = self.repository.find_by_key(key, true).await? else {
            trace!(key = %key, "short key not found");
            return Err(ManagerError::NotFound(key.to_string()));
        };

        // Counting is best-effort: the redirect must not fail because of it.
        match self.repository.increment_clicks(record.id).await {
            Ok(()) => record.clicks += 1,
            Err(e) => warn!(key = %key, error = %e, "failed to record click"),
        }

        debug!(key = %key, url = %record.target_url, "resolved short key");
        Ok(record)
    }

    async fn get_by_secret(&self, secret_key: &SecretKey) -> Result<UrlRecord> {
        self.find_for_admin(secret_key).await
    }

    async fn deactivate(&self, secret_key: &SecretKey) -> Result<UrlRecord> {
        let record = self.find_for_admin(secret_key).await?;

        if !record.is_active {
            debug!(key = %record.key, "record already inactive");
            return Ok(record);
        }

        let mut deactivated = record.clone();
        deactivated.is_active = false;
        deactivated.updated_at = Timestamp::now();

        if !self.repository.update(&deactivated).await? {
            return Err(ManagerError::NotFound(secret_key.to_string()));
        }

        info!(id = record.id, key = %record.key, "deactivated shortened url");
        Ok(record)
    }
}

fn generator_to_manager_error(e: GeneratorError) -> ManagerError {
    match e {
        GeneratorError::Exhausted { attempts } => {
            error!(attempts, "no unused key left to allocate");
            ManagerError::KeySpaceExhausted { attempts }
        }
        GeneratorError::Storage(source) => ManagerError::Storage(source),
    }
}
