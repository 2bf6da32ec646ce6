//! Delivery of committed lifecycle and ledger events to the audit collaborator.
//!
//! Delivery happens strictly after commit. A failure here is logged and
//! swallowed: the business operation has already succeeded and must not be
//! reported as failed or rolled back.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use stockyard_core::ActionContext;
use stockyard_documents::DocumentEvent;
use stockyard_events::{Event, EventBus, EventEnvelope};
use stockyard_inventory::{InventoryEvent, PostingKind, StockPosted, StockMovement};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("audit delivery failed: {0}")]
pub struct AuditError(pub String);

/// Receives audit envelopes.
pub trait AuditSink: Send + Sync {
    fn record(&self, envelope: EventEnvelope<JsonValue>) -> Result<(), AuditError>;
}

/// Publishes audit envelopes onto an [`EventBus`].
#[derive(Debug)]
pub struct BusAuditSink<B> {
    bus: B,
}

impl<B> BusAuditSink<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }
}

impl<B> AuditSink for BusAuditSink<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    fn record(&self, envelope: EventEnvelope<JsonValue>) -> Result<(), AuditError> {
        self.bus
            .publish(envelope)
            .map_err(|e| AuditError(format!("{e:?}")))
    }
}

/// Best-effort facade used by services.
#[derive(Clone, Default)]
pub struct AuditTrail {
    sink: Option<Arc<dyn AuditSink>>,
}

impl core::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

impl AuditTrail {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Audit onto an event bus.
    pub fn with_bus<B>(bus: B) -> Self
    where
        B: EventBus<EventEnvelope<JsonValue>> + 'static,
    {
        Self::new(Arc::new(BusAuditSink::new(bus)))
    }

    /// Drop every audit event.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn document(&self, event: &DocumentEvent, version: u64) {
        let stream_type = format!("document.{}", event.kind().as_str());
        self.deliver(stream_type, event.document_id().to_string(), version, event);
    }

    pub fn stock_posted(
        &self,
        posting: PostingKind,
        movements: &[StockMovement],
        ctx: &ActionContext,
    ) {
        let Some(first) = movements.first() else {
            return;
        };
        let event = InventoryEvent::StockPosted(StockPosted {
            posting,
            movements: movements.to_vec(),
            actor_id: ctx.actor_id,
            occurred_at: ctx.occurred_at,
        });
        self.deliver(
            "inventory.level".to_owned(),
            first.key().to_string(),
            first.level_version,
            &event,
        );
    }

    fn deliver<E>(&self, stream_type: String, stream_id: String, sequence: u64, event: &E)
    where
        E: Event + Serialize,
    {
        let Some(sink) = &self.sink else {
            return;
        };
        let envelope = match EventEnvelope::from_typed(stream_type, stream_id, sequence, event) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    %error,
                    "audit event could not be encoded"
                );
                return;
            }
        };
        if let Err(error) = sink.record(envelope) {
            tracing::warn!(event_type = event.event_type(), %error, "audit delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockyard_core::{ActorId, DocumentId};
    use stockyard_documents::DocumentCreated;
    use stockyard_events::InMemoryEventBus;
    use stockyard_workflow::DocumentKind;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _: EventEnvelope<JsonValue>) -> Result<(), AuditError> {
            Err(AuditError("sink offline".into()))
        }
    }

    fn created() -> DocumentEvent {
        DocumentEvent::Created(DocumentCreated {
            kind: DocumentKind::GatePass,
            document_id: DocumentId::new(),
            number: "GP-000001".into(),
            status: "draft".into(),
            actor_id: ActorId::new(),
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn document_events_reach_the_bus() {
        let bus: Arc<InMemoryEventBus<EventEnvelope<JsonValue>>> =
            Arc::new(InMemoryEventBus::new());
        let sub = bus.subscribe();
        let trail = AuditTrail::with_bus(bus.clone());

        let event = created();
        trail.document(&event, 1);

        let envelopes = sub.drain();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].event_type(), "document.created");
        assert_eq!(envelopes[0].stream_type(), "document.gate_pass");
        assert_eq!(envelopes[0].stream_id(), event.document_id().to_string());
        assert_eq!(envelopes[0].actor_id(), event.actor_id());
        assert_eq!(envelopes[0].schema_version(), 1);
    }

    #[test]
    fn failures_are_swallowed() {
        AuditTrail::new(Arc::new(FailingSink)).document(&created(), 1);
        AuditTrail::disabled().document(&created(), 1);
    }
}
