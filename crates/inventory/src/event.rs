use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::ActorId;
use stockyard_events::Event;

use crate::movement::StockMovement;
use crate::posting::PostingKind;

/// Event: StockPosted (one committed ledger posting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPosted {
    pub posting: PostingKind,
    pub movements: Vec<StockMovement>,
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockPosted(StockPosted),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockPosted(_) => "inventory.stock.posted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockPosted(e) => e.occurred_at,
        }
    }

    fn actor_id(&self) -> ActorId {
        match self {
            InventoryEvent::StockPosted(e) => e.actor_id,
        }
    }
}
