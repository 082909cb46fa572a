use keylink_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    #[error("no unused key found after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error("storage error while checking key: {0}")]
    Storage(#[from] StorageError),
}
