use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use stockyard_core::{
    ActionContext, ActorId, DocumentId, DomainError, DomainResult, ExpectedVersion,
};
use stockyard_inventory::LedgerEffect;
use stockyard_workflow::{DocumentKind, WorkflowStatus, ensure_transition};

/// One entry of a document's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: String,
    pub to: String,
    pub actor_id: ActorId,
    pub at: DateTime<Utc>,
}

/// Identity, numbering and audit fields shared by every document type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub id: DocumentId,
    pub number: String,
    version: u64,
    pub created_by: ActorId,
    pub created_at: DateTime<Utc>,
    pub updated_by: ActorId,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StatusChange>,
}

impl DocumentHeader {
    pub fn new(id: DocumentId, number: impl Into<String>, ctx: &ActionContext) -> Self {
        Self {
            id,
            number: number.into(),
            version: 0,
            created_by: ctx.actor_id,
            created_at: ctx.occurred_at,
            updated_by: ctx.actor_id,
            updated_at: ctx.occurred_at,
            history: Vec::new(),
        }
    }

    /// Version as last persisted; `0` for a document not yet stored.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Bump the version for a write, returning what the store must still hold.
    pub fn advance_version(&mut self) -> ExpectedVersion {
        let expected = ExpectedVersion::Exact(self.version);
        self.version += 1;
        expected
    }

    fn touch(&mut self, ctx: &ActionContext) {
        self.updated_by = ctx.actor_id;
        self.updated_at = ctx.occurred_at;
    }

    fn record_transition(&mut self, from: &str, to: &str, ctx: &ActionContext) {
        self.history.push(StatusChange {
            from: from.to_owned(),
            to: to.to_owned(),
            actor_id: ctx.actor_id,
            at: ctx.occurred_at,
        });
        self.touch(ctx);
    }
}

/// Reference to a document created as a side effect of another's transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedDocument {
    pub kind: DocumentKind,
    pub id: DocumentId,
    pub number: String,
}

/// Before/after pair returned by a successful field update.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated<D> {
    pub existing: D,
    pub updated: D,
}

/// A lifecycle-managed warehouse document.
///
/// Implementors provide field storage and their type-specific rules; the
/// provided methods enforce the shared contract:
/// - field edits are only accepted in the editable (initial) state,
/// - status changes only follow edges of the type's status graph,
/// - every accepted transition is appended to the header history.
pub trait Document:
    Clone + core::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Status: WorkflowStatus + Serialize + DeserializeOwned;
    type Patch: Clone + core::fmt::Debug + Send + Sync + 'static;

    fn header(&self) -> &DocumentHeader;

    fn header_mut(&mut self) -> &mut DocumentHeader;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Apply the changed fields of `patch`. Only called while editable.
    fn apply_changes(&mut self, patch: Self::Patch) -> DomainResult<()>;

    /// Business preconditions for entering `to`, beyond the status graph.
    fn check_entry(&self, _to: Self::Status, _ctx: &ActionContext) -> DomainResult<()> {
        Ok(())
    }

    /// Stamp type-specific fields once `to` has been entered.
    fn on_entry(&mut self, _to: Self::Status, _ctx: &ActionContext) {}

    /// Stock consequence of having entered `to`, if any.
    fn ledger_effect(&self, _to: Self::Status) -> Option<LedgerEffect> {
        None
    }

    fn kind() -> DocumentKind {
        <Self::Status as WorkflowStatus>::KIND
    }

    fn id(&self) -> DocumentId {
        self.header().id
    }

    fn number(&self) -> &str {
        &self.header().number
    }

    fn version(&self) -> u64 {
        self.header().version()
    }

    fn ensure_editable(&self) -> DomainResult<()> {
        let status = self.status();
        if status.is_editable() {
            Ok(())
        } else {
            Err(DomainError::fields_locked(
                format!("{} {}", Self::kind(), self.number()),
                status.as_str(),
            ))
        }
    }

    /// Apply a field update, rejecting it outright outside the editable state.
    fn update(&mut self, patch: Self::Patch, ctx: &ActionContext) -> DomainResult<()> {
        self.ensure_editable()?;
        self.apply_changes(patch)?;
        self.header_mut().touch(ctx);
        Ok(())
    }

    /// Move to `to`, returning the previous status.
    ///
    /// On error the document is unchanged.
    fn transition(&mut self, to: Self::Status, ctx: &ActionContext) -> DomainResult<Self::Status> {
        let from = self.status();
        ensure_transition(from, to)?;
        self.check_entry(to, ctx)?;
        self.set_status(to);
        self.on_entry(to, ctx);
        self.header_mut()
            .record_transition(from.as_str(), to.as_str(), ctx);
        Ok(from)
    }
}
