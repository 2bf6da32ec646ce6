use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{
    CycleCount, CycleCountPatch, CycleCountStatus, NewCycleCount, Updated,
};
use stockyard_inventory::LevelKey;

use crate::error::LifecycleResult;
use crate::retry::retry_on_conflict;
use crate::runtime::{StagedPosting, load_in, stage_transition};
use crate::store::{Store, UnitOfWork};

document_service! {
    /// Physical stock counts and the adjustments that follow them.
    CycleCountService for CycleCount {
        new: NewCycleCount,
        patch: CycleCountPatch,
        status: CycleCountStatus,
    }
}

impl<S: Store> CycleCountService<S> {
    /// Begin counting. System quantities are snapshotted from the levels
    /// read in the same unit of work as the status change.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn start(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<CycleCount> {
        let (count, from, posted) =
            retry_on_conflict(self.runtime.max_retries(), "cycle_count.start", || {
                self.start_once(id, ctx)
            })
            .await?;

        self.runtime.transitioned(&count, from, None, posted, ctx);
        Ok(count)
    }

    /// Enter the counted quantity for one line while counting is in progress.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn record_count(
        &self,
        id: DocumentId,
        line_no: u32,
        counted: Decimal,
        ctx: &ActionContext,
    ) -> LifecycleResult<Updated<CycleCount>> {
        self.runtime
            .edit_with(id, "cycle_count.record_count", ctx, |count: &mut CycleCount| {
                count.record_count(line_no, counted, ctx)
            })
            .await
    }

    /// Requires every line to be counted.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn complete(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<CycleCount> {
        self.move_to(id, CycleCountStatus::Completed, ctx).await
    }

    /// Set on-hand to the counted quantity for every line with a variance.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn apply_adjustments(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<CycleCount> {
        self.move_to(id, CycleCountStatus::Adjusted, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<CycleCount> {
        self.move_to(id, CycleCountStatus::Cancelled, ctx).await
    }

    async fn start_once(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<(CycleCount, CycleCountStatus, Option<StagedPosting>)> {
        let mut tx = self.runtime.store().begin().await?;
        let mut count: CycleCount = load_in(&mut tx, id).await?;

        let mut on_hand = HashMap::new();
        for item_id in count.item_ids() {
            let key = LevelKey::new(item_id, count.warehouse_id());
            if let Some(level) = tx.load_level(key).await? {
                on_hand.insert(item_id, level.qty_on_hand());
            }
        }

        let from = count.start(&on_hand, ctx)?;
        let posted = stage_transition(&mut tx, &mut count, ctx).await?;
        tx.commit().await?;
        Ok((count, from, posted))
    }
}
