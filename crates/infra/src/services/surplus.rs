//! Surplus item lifecycle.
//!
//! `action` is the one operation that writes two documents: the surplus item
//! moves to `actioned` and, for transfer and return dispositions, a draft
//! follow-up document is created in the same unit of work. The follow-up's
//! number is issued before that unit of work begins.

use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId, DomainError};
use stockyard_documents::{
    Disposition, Document, DocumentEvent, DocumentHeader, MaterialReturn, NewSurplusItem,
    SpawnRequest, SpawnedDocument, StockTransfer, SurplusItem, SurplusItemPatch, SurplusStatus,
};
use stockyard_workflow::ensure_transition;

use crate::error::LifecycleResult;
use crate::retry::retry_on_conflict;
use crate::runtime::{StagedPosting, load_in, stage_in, stage_transition};
use crate::store::{Store, UnitOfWork};

document_service! {
    SurplusService for SurplusItem {
        new: NewSurplusItem,
        patch: SurplusItemPatch,
        status: SurplusStatus,
    }
}

/// Result of actioning a surplus item.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub document: SurplusItem,
    pub spawned: Option<SpawnedDocument>,
}

/// Committed result of one `action` attempt.
type Actioned = (SurplusItem, SurplusStatus, Option<Spawned>, Option<StagedPosting>);

/// A follow-up document staged alongside the surplus item.
struct Spawned {
    reference: SpawnedDocument,
    event: DocumentEvent,
    version: u64,
}

impl<S: Store> SurplusService<S> {
    #[instrument(
        skip(self, disposition, ctx),
        fields(actor = %ctx.actor_id, %disposition),
        err
    )]
    pub async fn evaluate(
        &self,
        id: DocumentId,
        disposition: Disposition,
        ctx: &ActionContext,
    ) -> LifecycleResult<SurplusItem> {
        self.runtime
            .transition_with(id, "surplus.evaluate", ctx, |item: &mut SurplusItem| {
                item.evaluate(disposition.clone(), ctx)
            })
            .await
    }

    /// Secondary approval, allowed once the configured review period has
    /// passed since evaluation.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<SurplusItem> {
        let review_period = self.runtime.settings().surplus.review_period();
        self.runtime
            .transition_with(id, "surplus.approve", ctx, |item: &mut SurplusItem| {
                item.approve(review_period, ctx)
            })
            .await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn action(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<ActionOutcome> {
        let current: SurplusItem = self.runtime.get(id).await?;
        ensure_transition(current.status(), SurplusStatus::Actioned)?;
        let number = match current.spawn_request() {
            Some(request) => Some(self.runtime.next_number(request.kind()).await?),
            None => None,
        };

        let (document, from, spawned, posted) =
            retry_on_conflict(self.runtime.max_retries(), "surplus.action", || {
                self.action_once(id, number.as_deref(), ctx)
            })
            .await?;

        let spawned = spawned.map(|s| {
            self.runtime.audit().document(&s.event, s.version);
            s.reference
        });
        self.runtime
            .transitioned(&document, from, spawned.clone(), posted, ctx);
        Ok(ActionOutcome { document, spawned })
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn close(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<SurplusItem> {
        self.move_to(id, SurplusStatus::Closed, ctx).await
    }

    async fn action_once(
        &self,
        id: DocumentId,
        number: Option<&str>,
        ctx: &ActionContext,
    ) -> LifecycleResult<Actioned> {
        let mut tx = self.runtime.store().begin().await?;
        let mut item: SurplusItem = load_in(&mut tx, id).await?;
        let from = item.transition(SurplusStatus::Actioned, ctx)?;

        let spawned = match (item.spawn_request(), number) {
            (None, _) => None,
            (Some(request), Some(number)) => Some(spawn(&mut tx, request, number, ctx).await?),
            (Some(request), None) => {
                return Err(DomainError::invariant(format!(
                    "no number issued for the {} of surplus {}",
                    request.kind(),
                    item.number()
                ))
                .into());
            }
        };
        if let Some(spawned) = &spawned {
            item.record_spawned(spawned.reference.clone());
        }

        let posted = stage_transition(&mut tx, &mut item, ctx).await?;
        tx.commit().await?;
        Ok((item, from, spawned, posted))
    }
}

async fn spawn<T: UnitOfWork>(
    tx: &mut T,
    request: SpawnRequest,
    number: &str,
    ctx: &ActionContext,
) -> LifecycleResult<Spawned> {
    let header = DocumentHeader::new(DocumentId::new(), number, ctx);
    match request {
        SpawnRequest::StockTransfer(input) => {
            stage_new(tx, StockTransfer::create(header, input)?, ctx).await
        }
        SpawnRequest::MaterialReturn(input) => {
            stage_new(tx, MaterialReturn::create(header, input)?, ctx).await
        }
    }
}

async fn stage_new<D: Document, T: UnitOfWork>(
    tx: &mut T,
    mut doc: D,
    ctx: &ActionContext,
) -> LifecycleResult<Spawned> {
    stage_in(tx, &mut doc).await?;
    Ok(Spawned {
        reference: SpawnedDocument {
            kind: D::kind(),
            id: doc.id(),
            number: doc.number().to_owned(),
        },
        event: DocumentEvent::created(&doc, ctx),
        version: doc.version(),
    })
}
