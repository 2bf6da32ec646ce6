//! Who performs an action, and when.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ActorId;

/// Metadata accompanying every mutating operation.
///
/// Business time is passed in explicitly (like `occurred_at` on commands) so
/// time-gated rules stay deterministic under test.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

impl ActionContext {
    pub fn new(actor_id: ActorId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            actor_id,
            occurred_at,
        }
    }

    /// Context stamped with the current wall-clock time.
    pub fn now(actor_id: ActorId) -> Self {
        Self::new(actor_id, Utc::now())
    }
}
