//! Pure planning of ledger postings.
//!
//! A posting is checked in full against the levels read by the caller before
//! anything is staged: either every entry fits, or the whole posting is
//! rejected and nothing changes.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{
    ActionContext, AggregateRoot, DomainError, DomainResult, ExpectedVersion, ItemId, MovementId,
    Quantity, WarehouseId,
};

use crate::level::{InventoryLevel, LevelKey};
use crate::movement::{MovementKind, MovementReference, StockMovement};

/// How entries of a posting change on-hand quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingKind {
    Increase,
    Decrease,
    /// Set on-hand to the entry quantity (count adjustments).
    SetAbsolute,
}

/// One requested change against one item/warehouse pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub quantity: Decimal,
    pub movement: MovementKind,
    pub reference: Option<MovementReference>,
}

impl LedgerEntry {
    pub fn new(
        item_id: ItemId,
        warehouse_id: WarehouseId,
        quantity: Decimal,
        movement: MovementKind,
    ) -> Self {
        Self {
            item_id,
            warehouse_id,
            quantity,
            movement,
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: MovementReference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn key(&self) -> LevelKey {
        LevelKey::new(self.item_id, self.warehouse_id)
    }
}

/// A posting: the ledger consequence of an operation, applied all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEffect {
    pub posting: PostingKind,
    pub entries: Vec<LedgerEntry>,
}

impl LedgerEffect {
    pub fn increase(entries: Vec<LedgerEntry>) -> Self {
        Self {
            posting: PostingKind::Increase,
            entries,
        }
    }

    pub fn decrease(entries: Vec<LedgerEntry>) -> Self {
        Self {
            posting: PostingKind::Decrease,
            entries,
        }
    }

    pub fn set_absolute(entries: Vec<LedgerEntry>) -> Self {
        Self {
            posting: PostingKind::SetAbsolute,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct pairs touched, in first-seen order.
    pub fn keys(&self) -> Vec<LevelKey> {
        let mut keys: Vec<LevelKey> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let key = entry.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

/// A level to write, with the version it must still have at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLevel {
    pub level: InventoryLevel,
    pub expected: ExpectedVersion,
}

/// Result of planning a posting: new level states plus their movements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingPlan {
    pub levels: Vec<PlannedLevel>,
    pub movements: Vec<StockMovement>,
}

impl PostingPlan {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty() && self.movements.is_empty()
    }
}

/// Plan `effect` against the `current` levels.
///
/// Entries are applied in order; a pair appearing twice sees the first
/// entry's result. Pairs missing from `current` start from an empty level.
/// Each level written gets exactly one version bump regardless of how many
/// entries touch it.
///
/// Movements are per entry, not per pair: a pair listed twice (two document
/// lines for the same item) yields two movements, each with its own line
/// reference and running balance. Only when every pair appears once is this
/// one movement per affected pair.
pub fn plan_posting(
    effect: &LedgerEffect,
    current: &HashMap<LevelKey, InventoryLevel>,
    ctx: &ActionContext,
) -> DomainResult<PostingPlan> {
    let mut working: HashMap<LevelKey, InventoryLevel> = HashMap::new();
    let mut base_versions: HashMap<LevelKey, u64> = HashMap::new();
    let mut order: Vec<LevelKey> = Vec::new();
    let mut movements = Vec::with_capacity(effect.entries.len());

    for entry in &effect.entries {
        let key = entry.key();
        let level = working.entry(key).or_insert_with(|| {
            let base = current
                .get(&key)
                .cloned()
                .unwrap_or_else(|| InventoryLevel::empty(key));
            base_versions.insert(key, base.version());
            base
        });

        let delta = match effect.posting {
            PostingKind::Increase => {
                let qty = Quantity::new(entry.quantity)?;
                level.increase(qty, ctx.occurred_at);
                qty.value()
            }
            PostingKind::Decrease => {
                let qty = Quantity::new(entry.quantity)?;
                level.decrease(qty, ctx.occurred_at)?;
                -qty.value()
            }
            PostingKind::SetAbsolute => level.set_on_hand(entry.quantity, ctx.occurred_at)?,
        };

        if delta.is_zero() {
            continue;
        }
        if !order.contains(&key) {
            order.push(key);
        }

        let base = base_versions.get(&key).copied().unwrap_or_default();
        movements.push(StockMovement {
            id: MovementId::new(),
            item_id: entry.item_id,
            warehouse_id: entry.warehouse_id,
            kind: entry.movement,
            delta,
            balance_after: level.qty_on_hand(),
            level_version: base + 1,
            reference: entry.reference.clone(),
            actor_id: ctx.actor_id,
            occurred_at: ctx.occurred_at,
        });
    }

    let mut levels = Vec::with_capacity(order.len());
    for key in order {
        let base = base_versions.get(&key).copied().unwrap_or_default();
        let Some(mut level) = working.remove(&key) else {
            return Err(DomainError::invariant(format!("planned level {key} disappeared")));
        };
        level.set_version(base + 1);
        levels.push(PlannedLevel {
            level,
            expected: ExpectedVersion::Exact(base),
        });
    }

    Ok(PostingPlan { levels, movements })
}
