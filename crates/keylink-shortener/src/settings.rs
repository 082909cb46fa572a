use keylink_core::AdminLookupPolicy;
use keylink_generator::DEFAULT_MAX_ATTEMPTS;
use typed_builder::TypedBuilder;

/// Length of the random part of a secret key (~41 bits of entropy).
pub const DEFAULT_SECRET_SUFFIX_LENGTH: usize = 8;

/// Insert attempts per `create` before giving up on storage conflicts.
pub const DEFAULT_MAX_INSERT_ATTEMPTS: usize = 8;

/// Tuning knobs of the [`RecordManager`](crate::RecordManager).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ManagerSettings {
    #[builder(default = DEFAULT_SECRET_SUFFIX_LENGTH)]
    pub secret_suffix_length: usize,
    /// Candidate draws allowed per unique key.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_key_attempts: usize,
    /// Full key allocations allowed per create when inserts keep conflicting.
    #[builder(default = DEFAULT_MAX_INSERT_ATTEMPTS)]
    pub max_insert_attempts: usize,
    #[builder(default)]
    pub admin_lookup: AdminLookupPolicy,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
