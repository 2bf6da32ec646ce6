use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use stockyard_core::{ActorId, DocumentId, ExpectedVersion};
use stockyard_documents::Document;
use stockyard_inventory::{InventoryLevel, LevelKey, StockMovement};
use stockyard_workflow::{DocumentKind, WorkflowStatus};

/// A document as persisted: indexed metadata plus the full JSON payload.
///
/// The metadata columns mirror fields inside `payload` so backends can
/// filter and order without decoding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub kind: DocumentKind,
    pub id: DocumentId,
    pub number: String,
    pub status: String,
    pub version: u64,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub payload: JsonValue,
}

impl StoredDocument {
    pub fn from_document<D: Document>(doc: &D) -> Result<Self, StoreError> {
        let header = doc.header();
        let payload = serde_json::to_value(doc).map_err(|e| {
            StoreError::Serialization(format!("{} {}: {e}", D::kind(), header.number))
        })?;
        Ok(Self {
            kind: D::kind(),
            id: header.id,
            number: header.number.clone(),
            status: doc.status().as_str().to_owned(),
            version: header.version(),
            created_by: header.created_by,
            created_at: header.created_at,
            updated_at: header.updated_at,
            payload,
        })
    }

    pub fn decode<D: Document>(&self) -> Result<D, StoreError> {
        if self.kind != D::kind() {
            return Err(StoreError::Serialization(format!(
                "record {} is a {}, not a {}",
                self.id,
                self.kind,
                D::kind()
            )));
        }
        serde_json::from_value(self.payload.clone())
            .map_err(|e| StoreError::Serialization(format!("{} {}: {e}", self.kind, self.number)))
    }
}

/// Read-path filter for document listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub status: Option<String>,
    pub created_by: Option<ActorId>,
    pub offset: usize,
    /// `None` returns everything after `offset`.
    pub limit: Option<usize>,
}

impl DocumentFilter {
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn created_by(mut self, actor: ActorId) -> Self {
        self.created_by = Some(actor);
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &StoredDocument) -> bool {
        self.status.as_deref().is_none_or(|s| s == record.status)
            && self.created_by.is_none_or(|a| a == record.created_by)
    }
}

/// One page of a listing; `total` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
            total: self.total,
        })
    }
}

/// Storage operation error.
///
/// These are infrastructure failures; business rule failures never come
/// from the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A staged row's expected version no longer matches at commit.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// A uniqueness constraint (e.g. document number per kind) would break.
    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// One atomic unit of work.
///
/// Reads observe the unit's own staged writes. Dropping it without
/// `commit` discards everything staged.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn load_level(&mut self, key: LevelKey) -> Result<Option<InventoryLevel>, StoreError>;

    /// Stage a level write. If the key is staged twice, the first
    /// expectation is kept and the later state wins.
    async fn stage_level(
        &mut self,
        level: InventoryLevel,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError>;

    async fn stage_movement(&mut self, movement: StockMovement) -> Result<(), StoreError>;

    async fn load_document(
        &mut self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Same first-expectation rule as [`UnitOfWork::stage_level`].
    async fn stage_document(
        &mut self,
        record: StoredDocument,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError>;

    /// Verify every staged expectation and apply all staged writes, or none.
    async fn commit(self) -> Result<(), StoreError>;
}

/// Technology-independent persistence boundary.
#[async_trait]
pub trait Store: Send + Sync {
    type Tx: UnitOfWork;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    async fn inventory_level(&self, key: LevelKey) -> Result<Option<InventoryLevel>, StoreError>;

    /// Movements for one pair, oldest first.
    async fn movements(&self, key: LevelKey) -> Result<Vec<StockMovement>, StoreError>;

    async fn get_document(
        &self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Documents of `kind` matching `filter`, ordered by creation time.
    async fn list_documents(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Page<StoredDocument>, StoreError>;
}

#[async_trait]
impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    type Tx = S::Tx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        (**self).begin().await
    }

    async fn inventory_level(&self, key: LevelKey) -> Result<Option<InventoryLevel>, StoreError> {
        (**self).inventory_level(key).await
    }

    async fn movements(&self, key: LevelKey) -> Result<Vec<StockMovement>, StoreError> {
        (**self).movements(key).await
    }

    async fn get_document(
        &self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        (**self).get_document(kind, id).await
    }

    async fn list_documents(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Page<StoredDocument>, StoreError> {
        (**self).list_documents(kind, filter).await
    }
}
