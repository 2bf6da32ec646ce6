//! Audit envelope: stream metadata wrapped around a committed event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockyard_core::ActorId;
use uuid::Uuid;

use crate::event::Event;

/// Envelope for an event, containing stream metadata.
///
/// Notes:
/// - `stream_type` is the document type tag (e.g. `stock_transfer`) or `inventory`.
/// - `sequence_number` is the stream position the event describes (document
///   version, or inventory level version).
/// - `payload` is the domain-agnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    stream_type: String,
    stream_id: String,

    sequence_number: u64,

    event_type: String,
    schema_version: u32,
    occurred_at: DateTime<Utc>,
    actor_id: ActorId,

    payload: E,
}

impl<E> EventEnvelope<E> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        event_id: Uuid,
        stream_type: impl Into<String>,
        stream_id: impl Into<String>,
        sequence_number: u64,
        event_type: impl Into<String>,
        schema_version: u32,
        occurred_at: DateTime<Utc>,
        actor_id: ActorId,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            stream_type: stream_type.into(),
            stream_id: stream_id.into(),
            sequence_number,
            event_type: event_type.into(),
            schema_version,
            occurred_at,
            actor_id,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn stream_type(&self) -> &str {
        &self.stream_type
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl EventEnvelope<serde_json::Value> {
    /// Wrap a typed event as a JSON envelope, copying its metadata.
    pub fn from_typed<T>(
        stream_type: impl Into<String>,
        stream_id: impl Into<String>,
        sequence_number: u64,
        event: &T,
    ) -> Result<Self, serde_json::Error>
    where
        T: Event + Serialize,
    {
        Ok(Self::new(
            Uuid::now_v7(),
            stream_type,
            stream_id,
            sequence_number,
            event.event_type(),
            event.version(),
            event.occurred_at(),
            event.actor_id(),
            serde_json::to_value(event)?,
        ))
    }
}
