use crate::error::ManagerError;
use crate::key::{SecretKey, ShortKey};
use crate::repository::UrlRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ManagerError>;

/// Which records the admin path (lookup by secret key) can see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminLookupPolicy {
    /// Deactivated records stay inspectable by their owner as an audit trail.
    /// Deactivating twice is a no-op.
    #[default]
    IncludeInactive,
    /// Deactivation behaves like deletion: the secret key stops resolving.
    ActiveOnly,
}

impl AdminLookupPolicy {
    /// Whether a record with the given active flag is visible on the admin path.
    pub fn admits(self, is_active: bool) -> bool {
        match self {
            AdminLookupPolicy::IncludeInactive => true,
            AdminLookupPolicy::ActiveOnly => is_active,
        }
    }
}

/// Lifecycle operations on shortened URLs.
#[async_trait]
pub trait UrlManager: Send + Sync + 'static {
    /// Shortens `target_url`, returning the stored record with both keys.
    async fn create(&self, target_url: &str) -> Result<UrlRecord>;

    /// Resolves an active short key and counts the click.
    async fn resolve(&self, key: &ShortKey) -> Result<UrlRecord>;

    /// Looks a record up by its admin credential.
    async fn get_by_secret(&self, secret_key: &SecretKey) -> Result<UrlRecord>;

    /// Deactivates a record and returns it as it was before deactivation.
    async fn deactivate(&self, secret_key: &SecretKey) -> Result<UrlRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_inactive_admits_everything() {
        let policy = AdminLookupPolicy::default();
        assert!(policy.admits(true));
        assert!(policy.admits(false));
    }

    #[test]
    fn active_only_rejects_inactive() {
        let policy = AdminLookupPolicy::ActiveOnly;
        assert!(policy.admits(true));
        assert!(!policy.admits(false));
    }
}
