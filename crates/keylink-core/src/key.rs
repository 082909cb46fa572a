use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Separator between the short key and the random suffix of a secret key.
pub const SECRET_SEPARATOR: char = '_';

/// The public identifier of a shortened URL.
///
/// Keys coming from the outside (request paths) are not validated: an
/// unknown or malformed key simply does not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortKey(String);

impl ShortKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the public short link based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShortKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShortKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The admin credential of a shortened URL.
///
/// A secret key is the short key followed by `_` and a random suffix, so the
/// owning record can be cross-referenced at a glance while the suffix keeps
/// the credential unguessable.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Binds a random suffix to the given short key.
    pub fn derive(key: &ShortKey, suffix: &str) -> Self {
        Self(format!("{}{}{}", key.as_str(), SECRET_SEPARATOR, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the admin link based on the provided base URL.
    pub fn to_admin_url(&self, base_url: &str) -> String {
        format!("{}/admin/{}", base_url.trim_end_matches('/'), self.0)
    }
}

// Secret keys are credentials, keep them out of debug logs.
impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = self
            .0
            .split_once(SECRET_SEPARATOR)
            .map_or("", |(prefix, _)| prefix);
        f.debug_tuple("SecretKey")
            .field(&format_args!("{prefix}_***"))
            .finish()
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
