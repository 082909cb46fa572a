use crate::error::GeneratorError;
use crate::Generator;
use keylink_core::{ReadRepository, ShortKey};
use tracing::{debug, trace};

/// Upper bound on candidate draws for a single unique key.
///
/// With 36^5 possible keys this is only reached when the key space is close
/// to full or the generator is broken.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Draws candidates from `generator` until one has never been issued.
///
/// The existence check covers inactive records too, so a deactivated key is
/// never handed out again. This check is a fast path only: the storage
/// uniqueness constraint remains the backstop against concurrent creators.
pub async fn generate_unique_key<G, R>(
    generator: &G,
    repository: &R,
    max_attempts: usize,
) -> Result<ShortKey, GeneratorError>
where
    G: Generator + ?Sized,
    R: ReadRepository + ?Sized,
{
    for attempt in 1..=max_attempts {
        let candidate = generator.generate();
        if !repository.key_exists(&candidate).await? {
            trace!(key = %candidate, attempt, "allocated unused key");
            return Ok(candidate);
        }
        debug!(key = %candidate, attempt, "generated key already taken, drawing again");
    }

    Err(GeneratorError::Exhausted {
        attempts: max_attempts,
    })
}
