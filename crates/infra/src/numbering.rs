//! Human-readable document numbers (`STN-000042`).

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use stockyard_workflow::DocumentKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberingError {
    #[error("number sequence for {0} is exhausted")]
    Exhausted(DocumentKind),

    #[error("numbering service unavailable: {0}")]
    Unavailable(String),
}

/// Issues unique numbers per document type.
///
/// Called before the creating unit of work begins; the store's uniqueness
/// check at commit catches any collision.
#[async_trait]
pub trait DocumentNumbering: Send + Sync {
    async fn next_number(&self, kind: DocumentKind) -> Result<String, NumberingError>;
}

/// In-process counter per kind: `<PREFIX>-<000001>`.
#[derive(Debug, Default)]
pub struct SequentialNumbering {
    counters: Mutex<HashMap<DocumentKind, u64>>,
}

impl SequentialNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume each kind after its last issued value.
    pub fn starting_after(issued: impl IntoIterator<Item = (DocumentKind, u64)>) -> Self {
        Self {
            counters: Mutex::new(issued.into_iter().collect()),
        }
    }
}

#[async_trait]
impl DocumentNumbering for SequentialNumbering {
    async fn next_number(&self, kind: DocumentKind) -> Result<String, NumberingError> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(kind).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or(NumberingError::Exhausted(kind))?;
        Ok(format!("{}-{:06}", kind.number_prefix(), counter))
    }
}
