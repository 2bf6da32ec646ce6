use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use stockyard_core::{AggregateRoot, DocumentId, ExpectedVersion};
use stockyard_inventory::{InventoryLevel, LevelKey, StockMovement};
use stockyard_workflow::DocumentKind;

use super::r#trait::{DocumentFilter, Page, Store, StoreError, StoredDocument, UnitOfWork};

type DocumentKey = (DocumentKind, DocumentId);

#[derive(Debug, Default)]
struct State {
    levels: HashMap<LevelKey, InventoryLevel>,
    movements: Vec<StockMovement>,
    documents: HashMap<DocumentKey, StoredDocument>,
}

#[derive(Debug, Clone)]
struct Staged<T> {
    value: T,
    expected: ExpectedVersion,
}

/// In-memory store.
///
/// Intended for tests/dev. Commits serialize on a single write lock, which
/// makes check-and-apply atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total movements recorded across all pairs.
    pub async fn movement_count(&self) -> usize {
        self.state.read().await.movements.len()
    }
}

/// Unit of work over an [`InMemoryStore`].
#[derive(Debug)]
pub struct InMemoryTx {
    state: Arc<RwLock<State>>,
    levels: HashMap<LevelKey, Staged<InventoryLevel>>,
    movements: Vec<StockMovement>,
    documents: HashMap<DocumentKey, Staged<StoredDocument>>,
}

fn stage<K, T>(staged: &mut HashMap<K, Staged<T>>, key: K, value: T, expected: ExpectedVersion)
where
    K: Eq + core::hash::Hash,
{
    match staged.entry(key) {
        Entry::Occupied(mut slot) => slot.get_mut().value = value,
        Entry::Vacant(slot) => {
            slot.insert(Staged { value, expected });
        }
    }
}

#[async_trait]
impl UnitOfWork for InMemoryTx {
    async fn load_level(&mut self, key: LevelKey) -> Result<Option<InventoryLevel>, StoreError> {
        if let Some(staged) = self.levels.get(&key) {
            return Ok(Some(staged.value.clone()));
        }
        Ok(self.state.read().await.levels.get(&key).cloned())
    }

    async fn stage_level(
        &mut self,
        level: InventoryLevel,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        stage(&mut self.levels, level.key(), level, expected);
        Ok(())
    }

    async fn stage_movement(&mut self, movement: StockMovement) -> Result<(), StoreError> {
        self.movements.push(movement);
        Ok(())
    }

    async fn load_document(
        &mut self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        if let Some(staged) = self.documents.get(&(kind, id)) {
            return Ok(Some(staged.value.clone()));
        }
        Ok(self.state.read().await.documents.get(&(kind, id)).cloned())
    }

    async fn stage_document(
        &mut self,
        record: StoredDocument,
        expected: ExpectedVersion,
    ) -> Result<(), StoreError> {
        stage(&mut self.documents, (record.kind, record.id), record, expected);
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        for (key, staged) in &self.levels {
            let actual = state.levels.get(key).map(|l| l.version()).unwrap_or(0);
            if !staged.expected.matches(actual) {
                return Err(StoreError::Concurrency(format!(
                    "inventory level {key}: expected {:?}, found {actual}",
                    staged.expected
                )));
            }
        }

        for (key, staged) in &self.documents {
            let actual = state.documents.get(key).map(|d| d.version).unwrap_or(0);
            if !staged.expected.matches(actual) {
                return Err(StoreError::Concurrency(format!(
                    "{} {}: expected {:?}, found {actual}",
                    key.0, staged.value.number, staged.expected
                )));
            }
            let record = &staged.value;
            let taken_in_store = state.documents.values().any(|d| {
                d.kind == record.kind && d.number == record.number && d.id != record.id
            });
            let taken_in_tx = self.documents.values().any(|s| {
                s.value.kind == record.kind && s.value.number == record.number && s.value.id != record.id
            });
            if taken_in_store || taken_in_tx {
                return Err(StoreError::Duplicate(format!(
                    "{} number {} is already in use",
                    record.kind, record.number
                )));
            }
        }

        for (key, staged) in self.levels {
            state.levels.insert(key, staged.value);
        }
        for (key, staged) in self.documents {
            state.documents.insert(key, staged.value);
        }
        state.movements.extend(self.movements);
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<InMemoryTx, StoreError> {
        Ok(InMemoryTx {
            state: Arc::clone(&self.state),
            levels: HashMap::new(),
            movements: Vec::new(),
            documents: HashMap::new(),
        })
    }

    async fn inventory_level(&self, key: LevelKey) -> Result<Option<InventoryLevel>, StoreError> {
        Ok(self.state.read().await.levels.get(&key).cloned())
    }

    async fn movements(&self, key: LevelKey) -> Result<Vec<StockMovement>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .movements
            .iter()
            .filter(|m| m.key() == key)
            .cloned()
            .collect())
    }

    async fn get_document(
        &self,
        kind: DocumentKind,
        id: DocumentId,
    ) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.state.read().await.documents.get(&(kind, id)).cloned())
    }

    async fn list_documents(
        &self,
        kind: DocumentKind,
        filter: &DocumentFilter,
    ) -> Result<Page<StoredDocument>, StoreError> {
        let state = self.state.read().await;
        let mut matching: Vec<&StoredDocument> = state
            .documents
            .values()
            .filter(|d| d.kind == kind && filter.matches(d))
            .collect();
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.number.cmp(&b.number))
        });

        let total = matching.len();
        let data = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(Page { data, total })
    }
}
