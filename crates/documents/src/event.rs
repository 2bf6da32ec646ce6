use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DocumentId};
use stockyard_events::Event;
use stockyard_workflow::{DocumentKind, WorkflowStatus};

use crate::document::{Document, SpawnedDocument};

/// Event: DocumentCreated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCreated {
    pub kind: DocumentKind,
    pub document_id: DocumentId,
    pub number: String,
    pub status: String,
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentUpdated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpdated {
    pub kind: DocumentKind,
    pub document_id: DocumentId,
    pub number: String,
    pub version: u64,
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DocumentTransitioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTransitioned {
    pub kind: DocumentKind,
    pub document_id: DocumentId,
    pub number: String,
    pub from: String,
    pub to: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned: Option<SpawnedDocument>,
    pub actor_id: ActorId,
    pub occurred_at: DateTime<Utc>,
}

/// Audit facts emitted after a document write commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentEvent {
    Created(DocumentCreated),
    Updated(DocumentUpdated),
    Transitioned(DocumentTransitioned),
}

impl DocumentEvent {
    pub fn created<D: Document>(doc: &D, ctx: &ActionContext) -> Self {
        DocumentEvent::Created(DocumentCreated {
            kind: D::kind(),
            document_id: doc.id(),
            number: doc.number().to_owned(),
            status: doc.status().as_str().to_owned(),
            actor_id: ctx.actor_id,
            occurred_at: ctx.occurred_at,
        })
    }

    pub fn updated<D: Document>(doc: &D, ctx: &ActionContext) -> Self {
        DocumentEvent::Updated(DocumentUpdated {
            kind: D::kind(),
            document_id: doc.id(),
            number: doc.number().to_owned(),
            version: doc.version(),
            actor_id: ctx.actor_id,
            occurred_at: ctx.occurred_at,
        })
    }

    pub fn transitioned<D: Document>(
        doc: &D,
        from: D::Status,
        spawned: Option<SpawnedDocument>,
        ctx: &ActionContext,
    ) -> Self {
        DocumentEvent::Transitioned(DocumentTransitioned {
            kind: D::kind(),
            document_id: doc.id(),
            number: doc.number().to_owned(),
            from: from.as_str().to_owned(),
            to: doc.status().as_str().to_owned(),
            version: doc.version(),
            spawned,
            actor_id: ctx.actor_id,
            occurred_at: ctx.occurred_at,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentEvent::Created(e) => e.kind,
            DocumentEvent::Updated(e) => e.kind,
            DocumentEvent::Transitioned(e) => e.kind,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        match self {
            DocumentEvent::Created(e) => e.document_id,
            DocumentEvent::Updated(e) => e.document_id,
            DocumentEvent::Transitioned(e) => e.document_id,
        }
    }
}

impl Event for DocumentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::Created(_) => "document.created",
            DocumentEvent::Updated(_) => "document.updated",
            DocumentEvent::Transitioned(_) => "document.transitioned",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DocumentEvent::Created(e) => e.occurred_at,
            DocumentEvent::Updated(e) => e.occurred_at,
            DocumentEvent::Transitioned(e) => e.occurred_at,
        }
    }

    fn actor_id(&self) -> ActorId {
        match self {
            DocumentEvent::Created(e) => e.actor_id,
            DocumentEvent::Updated(e) => e.actor_id,
            DocumentEvent::Transitioned(e) => e.actor_id,
        }
    }
}
