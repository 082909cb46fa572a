pub mod error;
pub mod random;
pub mod unique;

pub use error::GeneratorError;
pub use random::{generate_key, RandomGenerator, ALPHABET, DEFAULT_KEY_LENGTH};
pub use unique::{generate_unique_key, DEFAULT_MAX_ATTEMPTS};

use keylink_core::ShortKey;

/// Trait for generating candidate short keys.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness is established by [`generate_unique_key`] against the
/// repository.
pub trait Generator: Send + Sync + 'static {
    /// Draws a new candidate key.
    fn generate(&self) -> ShortKey;
}
