//! Errors surfaced by lifecycle services and the inventory ledger.

use thiserror::Error;

use stockyard_core::DomainError;

use crate::numbering::NumberingError;
use crate::store::StoreError;

pub type LifecycleResult<T> = Result<T, LifecycleError>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Business rule failure, including optimistic conflicts that outlived
    /// their retries.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failed for a reason other than a version conflict.
    #[error("store failure: {0}")]
    Store(StoreError),

    /// No document number could be obtained; nothing was written.
    #[error("document numbering failed: {0}")]
    Numbering(#[from] NumberingError),

    /// A stored payload could not be decoded into its document type.
    #[error("failed to decode stored document: {0}")]
    Deserialize(String),
}

impl From<StoreError> for LifecycleError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => LifecycleError::Domain(DomainError::concurrent(msg)),
            StoreError::Serialization(msg) => LifecycleError::Deserialize(msg),
            other => LifecycleError::Store(other),
        }
    }
}

impl LifecycleError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            LifecycleError::Domain(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.as_domain().is_some_and(DomainError::is_retryable)
    }
}
