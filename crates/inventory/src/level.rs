use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{
    AggregateRoot, DomainError, DomainResult, ItemId, Quantity, ValueObject, WarehouseId,
};

/// Identity of an inventory level row: one per item × warehouse pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LevelKey {
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
}

impl LevelKey {
    pub fn new(item_id: ItemId, warehouse_id: WarehouseId) -> Self {
        Self {
            item_id,
            warehouse_id,
        }
    }
}

impl ValueObject for LevelKey {}

impl core::fmt::Display for LevelKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.item_id, self.warehouse_id)
    }
}

/// Aggregate root: InventoryLevel.
///
/// Created lazily on the first movement for a pair, never deleted. A zero
/// balance is a valid steady state; a negative one is not representable
/// through the methods below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    key: LevelKey,
    qty_on_hand: Decimal,
    version: u64,
    last_movement_date: Option<DateTime<Utc>>,
}

impl InventoryLevel {
    /// A pair that has never moved (version 0, nothing on hand).
    pub fn empty(key: LevelKey) -> Self {
        Self {
            key,
            qty_on_hand: Decimal::ZERO,
            version: 0,
            last_movement_date: None,
        }
    }

    /// Rebuild a level from persisted state.
    pub fn restore(
        key: LevelKey,
        qty_on_hand: Decimal,
        version: u64,
        last_movement_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        if qty_on_hand < Decimal::ZERO {
            return Err(DomainError::invariant(format!(
                "persisted level {key} has negative quantity {qty_on_hand}"
            )));
        }
        Ok(Self {
            key,
            qty_on_hand,
            version,
            last_movement_date,
        })
    }

    pub fn key(&self) -> LevelKey {
        self.key
    }

    pub fn item_id(&self) -> ItemId {
        self.key.item_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.key.warehouse_id
    }

    pub fn qty_on_hand(&self) -> Decimal {
        self.qty_on_hand
    }

    pub fn last_movement_date(&self) -> Option<DateTime<Utc>> {
        self.last_movement_date
    }

    pub fn is_persisted(&self) -> bool {
        self.version > 0
    }

    pub(crate) fn increase(&mut self, qty: Quantity, at: DateTime<Utc>) {
        self.qty_on_hand += qty.value();
        self.last_movement_date = Some(at);
    }

    pub(crate) fn decrease(&mut self, qty: Quantity, at: DateTime<Utc>) -> DomainResult<()> {
        if self.qty_on_hand < qty.value() {
            return Err(DomainError::insufficient_stock(
                self.key.item_id,
                self.key.warehouse_id,
                self.qty_on_hand,
                qty.value(),
            ));
        }
        self.qty_on_hand -= qty.value();
        self.last_movement_date = Some(at);
        Ok(())
    }

    /// Returns the signed delta; a no-op set leaves the level untouched.
    pub(crate) fn set_on_hand(&mut self, target: Decimal, at: DateTime<Utc>) -> DomainResult<Decimal> {
        if target < Decimal::ZERO {
            return Err(DomainError::invalid_quantity(format!(
                "absolute quantity must not be negative, got {target}"
            )));
        }
        let delta = target - self.qty_on_hand;
        if !delta.is_zero() {
            self.qty_on_hand = target;
            self.last_movement_date = Some(at);
        }
        Ok(delta)
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl AggregateRoot for InventoryLevel {
    type Id = LevelKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }

    fn version(&self) -> u64 {
        self.version
    }
}
