use chrono::{DateTime, Utc};
use stockyard_core::ActorId;

/// A committed fact worth auditing: a document lifecycle step or a ledger
/// posting. Never published for work that was rolled back.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name, e.g. `document.transitioned` or `inventory.stock.posted`.
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc>;

    /// Who caused it.
    fn actor_id(&self) -> ActorId;
}
