use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{ActorId, DocumentId, Entity, ItemId, MovementId, WarehouseId};

use crate::level::LevelKey;

/// Why stock moved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Receipt,
    Issue,
    TransferOut,
    TransferIn,
    Return,
    Adjustment,
}

/// The document line that caused a movement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementReference {
    /// Document type tag (`stock_transfer`, `cycle_count`, ...).
    pub reference_type: String,
    pub reference_id: DocumentId,
    pub line_no: Option<u32>,
}

impl MovementReference {
    pub fn new(reference_type: impl Into<String>, reference_id: DocumentId) -> Self {
        Self {
            reference_type: reference_type.into(),
            reference_id,
            line_no: None,
        }
    }

    pub fn line(mut self, line_no: u32) -> Self {
        self.line_no = Some(line_no);
        self
    }
}

/// Append-only audit record of one change to one inventory level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub kind: MovementKind,
    /// Signed change applied to `qty_on_hand`.
    pub delta: Decimal,
    pub balance_after: Decimal,
    /// Level version written by this movement.
    pub level_version: u64,
    pub reference: Option<MovementReference>,
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn key(&self) -> LevelKey {
        LevelKey::new(self.item_id, self.warehouse_id)
    }
}

impl Entity for StockMovement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
