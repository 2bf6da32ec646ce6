//! Inventory ledger service.
//!
//! Every mutation loads the affected levels inside one unit of work, plans
//! the posting purely, stages the plan and commits. A commit that loses an
//! optimistic race is retried from scratch, so the insufficient-stock check
//! always runs against the version that is actually written over.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::instrument;

use stockyard_core::{ActionContext, ItemId, WarehouseId};
use stockyard_inventory::{
    InventoryLevel, LedgerEffect, LedgerEntry, LevelKey, MovementKind, MovementReference,
    PostingPlan, StockMovement, plan_posting,
};

use crate::audit::AuditTrail;
use crate::error::{LifecycleError, LifecycleResult};
use crate::retry::retry_on_conflict;
use crate::settings::LedgerSettings;
use crate::store::{Store, UnitOfWork};

/// Apply `effect` inside an existing unit of work.
///
/// Nothing is staged unless the whole posting is valid against the levels
/// as this unit of work sees them.
pub async fn post<T: UnitOfWork>(
    tx: &mut T,
    effect: &LedgerEffect,
    ctx: &ActionContext,
) -> LifecycleResult<PostingPlan> {
    let mut current = HashMap::new();
    for key in effect.keys() {
        if let Some(level) = tx.load_level(key).await? {
            current.insert(key, level);
        }
    }

    let plan = plan_posting(effect, &current, ctx)?;

    for planned in &plan.levels {
        tx.stage_level(planned.level.clone(), planned.expected).await?;
    }
    for movement in &plan.movements {
        tx.stage_movement(movement.clone()).await?;
    }
    Ok(plan)
}

/// Standalone ledger operations, each its own unit of work.
#[derive(Debug, Clone)]
pub struct InventoryLedger<S> {
    store: S,
    audit: AuditTrail,
    max_retries: u32,
}

impl<S: Store> InventoryLedger<S> {
    pub fn new(store: S, audit: AuditTrail, settings: &LedgerSettings) -> Self {
        Self {
            store,
            audit,
            max_retries: settings.max_conflict_retries,
        }
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn increase(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        quantity: Decimal,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockMovement> {
        let entry = LedgerEntry::new(item_id, warehouse_id, quantity, MovementKind::Receipt);
        single(self.apply(LedgerEffect::increase(vec![entry]), ctx).await?)
    }

    #[instrument(skip(self, ctx, reference), fields(actor = %ctx.actor_id), err)]
    pub async fn decrease(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        quantity: Decimal,
        ctx: &ActionContext,
        reference: Option<MovementReference>,
    ) -> LifecycleResult<StockMovement> {
        let mut entry = LedgerEntry::new(item_id, warehouse_id, quantity, MovementKind::Issue);
        entry.reference = reference;
        single(self.apply(LedgerEffect::decrease(vec![entry]), ctx).await?)
    }

    /// All entries apply or none do.
    #[instrument(skip_all, fields(entries = entries.len(), actor = %ctx.actor_id), err)]
    pub async fn increase_batch(
        &self,
        entries: Vec<LedgerEntry>,
        ctx: &ActionContext,
    ) -> LifecycleResult<Vec<StockMovement>> {
        self.apply(LedgerEffect::increase(entries), ctx).await
    }

    /// All entries apply or none do; one short entry rejects the batch.
    #[instrument(skip_all, fields(entries = entries.len(), actor = %ctx.actor_id), err)]
    pub async fn decrease_batch(
        &self,
        entries: Vec<LedgerEntry>,
        ctx: &ActionContext,
    ) -> LifecycleResult<Vec<StockMovement>> {
        self.apply(LedgerEffect::decrease(entries), ctx).await
    }

    /// Set on-hand to `quantity`; `None` when it already was.
    #[instrument(skip(self, ctx, reference), fields(actor = %ctx.actor_id), err)]
    pub async fn set_quantity(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        quantity: Decimal,
        ctx: &ActionContext,
        reference: Option<MovementReference>,
    ) -> LifecycleResult<Option<StockMovement>> {
        let mut entry = LedgerEntry::new(item_id, warehouse_id, quantity, MovementKind::Adjustment);
        entry.reference = reference;
        let movements = self.apply(LedgerEffect::set_absolute(vec![entry]), ctx).await?;
        Ok(movements.into_iter().next())
    }

    /// Current level; a pair that never moved reads as zero.
    pub async fn level(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
    ) -> LifecycleResult<InventoryLevel> {
        let key = LevelKey::new(item_id, warehouse_id);
        Ok(self
            .store
            .inventory_level(key)
            .await?
            .unwrap_or_else(|| InventoryLevel::empty(key)))
    }

    pub async fn movements(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
    ) -> LifecycleResult<Vec<StockMovement>> {
        Ok(self
            .store
            .movements(LevelKey::new(item_id, warehouse_id))
            .await?)
    }

    /// Apply a posting in its own unit of work, retrying version conflicts.
    pub async fn apply(
        &self,
        effect: LedgerEffect,
        ctx: &ActionContext,
    ) -> LifecycleResult<Vec<StockMovement>> {
        let plan = retry_on_conflict(self.max_retries, "ledger.apply", || {
            self.apply_once(&effect, ctx)
        })
        .await?;

        tracing::info!(
            posting = ?effect.posting,
            movements = plan.movements.len(),
            "ledger posting committed"
        );
        self.audit.stock_posted(effect.posting, &plan.movements, ctx);
        Ok(plan.movements)
    }

    async fn apply_once(
        &self,
        effect: &LedgerEffect,
        ctx: &ActionContext,
    ) -> LifecycleResult<PostingPlan> {
        let mut tx = self.store.begin().await?;
        let plan = post(&mut tx, effect, ctx).await?;
        tx.commit().await?;
        Ok(plan)
    }
}

fn single(movements: Vec<StockMovement>) -> LifecycleResult<StockMovement> {
    movements.into_iter().next().ok_or_else(|| {
        LifecycleError::Domain(stockyard_core::DomainError::invariant(
            "posting produced no movement",
        ))
    })
}
