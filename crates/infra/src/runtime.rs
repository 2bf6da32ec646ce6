//! Document lifecycle execution pipeline.
//!
//! Every lifecycle operation on every document type runs through the same
//! steps:
//!
//! ```text
//! operation
//!   ↓
//! 1. (create only) obtain a document number, before any write
//!   ↓
//! 2. begin a unit of work, load + decode the document
//!   ↓
//! 3. apply the pure document change (registry check, entry rules, stamps)
//!   ↓
//! 4. post the ledger effect of the entered status in the same unit of work
//!   ↓
//! 5. stage the document with its version expectation, commit
//!   ↓
//! 6. log, then hand the event to the audit trail (best effort)
//! ```
//!
//! A version conflict at step 5 restarts from step 2 a bounded number of
//! times. Any other failure leaves the store exactly as it was.

use std::sync::Arc;

use tracing::{Instrument, info_span};

use stockyard_core::{ActionContext, DocumentId, DomainError, DomainResult};
use stockyard_documents::{Document, DocumentEvent, DocumentHeader, SpawnedDocument, Updated};
use stockyard_inventory::{PostingKind, StockMovement};
use stockyard_workflow::{DocumentKind, WorkflowStatus};

use crate::audit::AuditTrail;
use crate::error::LifecycleResult;
use crate::ledger;
use crate::numbering::DocumentNumbering;
use crate::retry::retry_on_conflict;
use crate::settings::Settings;
use crate::store::{DocumentFilter, Page, Store, StoredDocument, UnitOfWork};

/// Shared engine behind the per-type lifecycle services.
#[derive(Clone)]
pub struct DocumentRuntime<S> {
    store: S,
    numbering: Arc<dyn DocumentNumbering>,
    audit: AuditTrail,
    settings: Settings,
}

impl<S: core::fmt::Debug> core::fmt::Debug for DocumentRuntime<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DocumentRuntime")
            .field("store", &self.store)
            .field("audit", &self.audit)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Load and decode a document inside `tx`.
pub(crate) async fn load_in<D, T>(tx: &mut T, id: DocumentId) -> LifecycleResult<D>
where
    D: Document,
    T: UnitOfWork,
{
    let record = tx
        .load_document(D::kind(), id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("{} {id}", D::kind())))?;
    Ok(record.decode::<D>()?)
}

/// Stage `doc` for writing, bumping its version.
pub(crate) async fn stage_in<D, T>(tx: &mut T, doc: &mut D) -> LifecycleResult<()>
where
    D: Document,
    T: UnitOfWork,
{
    let expected = doc.header_mut().advance_version();
    let record = StoredDocument::from_document(doc)?;
    tx.stage_document(record, expected).await?;
    Ok(())
}

/// Movements staged alongside a transition; audited once the unit of work
/// has committed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StagedPosting {
    pub posting: PostingKind,
    pub movements: Vec<StockMovement>,
}

/// Stage `doc` and post the ledger effect of the status it just entered.
pub(crate) async fn stage_transition<D, T>(
    tx: &mut T,
    doc: &mut D,
    ctx: &ActionContext,
) -> LifecycleResult<Option<StagedPosting>>
where
    D: Document,
    T: UnitOfWork,
{
    let mut staged = None;
    if let Some(effect) = doc.ledger_effect(doc.status()) {
        if !effect.is_empty() {
            let plan = ledger::post(tx, &effect, ctx).await?;
            tracing::debug!(
                document = %doc.number(),
                movements = plan.movements.len(),
                "ledger effect staged"
            );
            if !plan.movements.is_empty() {
                staged = Some(StagedPosting {
                    posting: effect.posting,
                    movements: plan.movements,
                });
            }
        }
    }
    stage_in(tx, doc).await?;
    Ok(staged)
}

impl<S: Store> DocumentRuntime<S> {
    pub fn new(
        store: S,
        numbering: Arc<dyn DocumentNumbering>,
        audit: AuditTrail,
        settings: Settings,
    ) -> Self {
        Self {
            store,
            numbering,
            audit,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    pub(crate) fn max_retries(&self) -> u32 {
        self.settings.ledger.max_conflict_retries
    }

    pub(crate) async fn next_number(&self, kind: DocumentKind) -> LifecycleResult<String> {
        Ok(self.numbering.next_number(kind).await?)
    }

    /// Create a document in its initial status.
    ///
    /// The number is issued before anything is written; if numbering fails
    /// nothing is persisted.
    pub async fn create<D, F>(&self, build: F, ctx: &ActionContext) -> LifecycleResult<D>
    where
        D: Document,
        F: FnOnce(DocumentHeader) -> DomainResult<D>,
    {
        let number = self.next_number(D::kind()).await?;
        let span = info_span!("document.create", kind = %D::kind(), %number);

        async {
            let mut doc = build(DocumentHeader::new(DocumentId::new(), number, ctx))?;
            let mut tx = self.store.begin().await?;
            stage_in(&mut tx, &mut doc).await?;
            tx.commit().await?;

            tracing::info!(id = %doc.id(), "document created");
            self.audit
                .document(&DocumentEvent::created(&doc, ctx), doc.version());
            Ok(doc)
        }
        .instrument(span)
        .await
    }

    pub async fn get<D: Document>(&self, id: DocumentId) -> LifecycleResult<D> {
        let record = self
            .store
            .get_document(D::kind(), id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("{} {id}", D::kind())))?;
        Ok(record.decode::<D>()?)
    }

    pub async fn list<D: Document>(&self, filter: &DocumentFilter) -> LifecycleResult<Page<D>> {
        let page = self.store.list_documents(D::kind(), filter).await?;
        Ok(page.try_map(|record| record.decode::<D>())?)
    }

    /// Apply a field update; rejected with `FieldsLocked` outside the
    /// editable status.
    pub async fn update<D: Document>(
        &self,
        id: DocumentId,
        patch: D::Patch,
        ctx: &ActionContext,
    ) -> LifecycleResult<Updated<D>> {
        self.edit_with(id, "document.update", ctx, |doc: &mut D| {
            doc.update(patch.clone(), ctx)
        })
        .await
    }

    /// Plain transition to `to`.
    pub async fn transition<D: Document>(
        &self,
        id: DocumentId,
        to: D::Status,
        ctx: &ActionContext,
    ) -> LifecycleResult<D> {
        self.transition_with(id, "document.transition", ctx, |doc: &mut D| {
            doc.transition(to, ctx)
        })
        .await
    }

    /// Transition through a type-specific method that returns the previous
    /// status, e.g. one that also records extra fields.
    pub async fn transition_with<D, F>(
        &self,
        id: DocumentId,
        operation: &'static str,
        ctx: &ActionContext,
        apply: F,
    ) -> LifecycleResult<D>
    where
        D: Document,
        F: Fn(&mut D) -> DomainResult<D::Status> + Sync,
    {
        let span = info_span!("document.transition", kind = %D::kind(), %id, operation);
        let (doc, from, posted) = retry_on_conflict(self.max_retries(), operation, || {
            self.transition_once(id, ctx, &apply)
        })
        .instrument(span)
        .await?;

        self.transitioned(&doc, from, None, posted, ctx);
        Ok(doc)
    }

    async fn transition_once<D, F>(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
        apply: &F,
    ) -> LifecycleResult<(D, D::Status, Option<StagedPosting>)>
    where
        D: Document,
        F: Fn(&mut D) -> DomainResult<D::Status> + Sync,
    {
        let mut tx = self.store.begin().await?;
        let mut doc: D = load_in(&mut tx, id).await?;
        let from = apply(&mut doc)?;
        let posted = stage_transition(&mut tx, &mut doc, ctx).await?;
        tx.commit().await?;
        Ok((doc, from, posted))
    }

    /// Mutate a document without changing its status.
    pub(crate) async fn edit_with<D, F>(
        &self,
        id: DocumentId,
        operation: &'static str,
        ctx: &ActionContext,
        apply: F,
    ) -> LifecycleResult<Updated<D>>
    where
        D: Document,
        F: Fn(&mut D) -> DomainResult<()> + Sync,
    {
        let span = info_span!("document.edit", kind = %D::kind(), %id, operation);
        let updated = retry_on_conflict(self.max_retries(), operation, || {
            self.edit_once(id, &apply)
        })
        .instrument(span)
        .await?;

        tracing::info!(
            kind = %D::kind(),
            number = %updated.updated.number(),
            version = updated.updated.version(),
            "document updated"
        );
        self.audit.document(
            &DocumentEvent::updated(&updated.updated, ctx),
            updated.updated.version(),
        );
        Ok(updated)
    }

    async fn edit_once<D, F>(&self, id: DocumentId, apply: &F) -> LifecycleResult<Updated<D>>
    where
        D: Document,
        F: Fn(&mut D) -> DomainResult<()> + Sync,
    {
        let mut tx = self.store.begin().await?;
        let existing: D = load_in(&mut tx, id).await?;
        let mut updated = existing.clone();
        apply(&mut updated)?;
        stage_in(&mut tx, &mut updated).await?;
        tx.commit().await?;
        Ok(Updated { existing, updated })
    }

    /// Log and audit a committed transition and the stock it moved.
    pub(crate) fn transitioned<D: Document>(
        &self,
        doc: &D,
        from: D::Status,
        spawned: Option<SpawnedDocument>,
        posted: Option<StagedPosting>,
        ctx: &ActionContext,
    ) {
        tracing::info!(
            kind = %D::kind(),
            number = %doc.number(),
            from = from.as_str(),
            to = doc.status().as_str(),
            version = doc.version(),
            "document transitioned"
        );
        self.audit.document(
            &DocumentEvent::transitioned(doc, from, spawned, ctx),
            doc.version(),
        );
        if let Some(posted) = posted {
            self.audit
                .stock_posted(posted.posting, &posted.movements, ctx);
        }
    }
}
