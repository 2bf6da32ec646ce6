//! Material return voucher: previously issued stock coming back.
//!
//! Only lines returned in good condition are restocked on completion;
//! damaged and rejected lines are recorded but never enter stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainResult, WarehouseId};
use stockyard_inventory::{LedgerEffect, MovementKind};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{DocumentLine, NewLine, ensure_has_lines, number_lines};

workflow_status! {
    pub enum MaterialReturnStatus for DocumentKind::MaterialReturn {
        Draft => "draft",
        Pending => "pending",
        Received => "received",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterialReturn {
    pub warehouse_id: WarehouseId,
    pub reason: Option<String>,
    pub lines: Vec<NewLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialReturnPatch {
    pub warehouse_id: Option<WarehouseId>,
    pub reason: Option<String>,
    pub lines: Option<Vec<NewLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialReturn {
    header: DocumentHeader,
    status: MaterialReturnStatus,
    warehouse_id: WarehouseId,
    reason: Option<String>,
    lines: Vec<DocumentLine>,
    received_by: Option<ActorId>,
    received_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl MaterialReturn {
    pub fn create(header: DocumentHeader, input: NewMaterialReturn) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: MaterialReturnStatus::Draft,
            warehouse_id: input.warehouse_id,
            reason: input.reason,
            lines: number_lines(input.lines)?,
            received_by: None,
            received_at: None,
            completed_at: None,
        })
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn received_by(&self) -> Option<ActorId> {
        self.received_by
    }

    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

impl Document for MaterialReturn {
    type Status = MaterialReturnStatus;
    type Patch = MaterialReturnPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> MaterialReturnStatus {
        self.status
    }

    fn set_status(&mut self, status: MaterialReturnStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: MaterialReturnPatch) -> DomainResult<()> {
        if let Some(lines) = patch.lines {
            self.lines = number_lines(lines)?;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(reason) = patch.reason {
            self.reason = Some(reason);
        }
        Ok(())
    }

    fn check_entry(&self, to: MaterialReturnStatus, _ctx: &ActionContext) -> DomainResult<()> {
        if to == MaterialReturnStatus::Pending {
            ensure_has_lines(DocumentKind::MaterialReturn, self.number(), &self.lines)?;
        }
        Ok(())
    }

    fn on_entry(&mut self, to: MaterialReturnStatus, ctx: &ActionContext) {
        match to {
            MaterialReturnStatus::Received => {
                self.received_by = Some(ctx.actor_id);
                self.received_at = Some(ctx.occurred_at);
            }
            MaterialReturnStatus::Completed => self.completed_at = Some(ctx.occurred_at),
            _ => {}
        }
    }

    fn ledger_effect(&self, to: MaterialReturnStatus) -> Option<LedgerEffect> {
        if to != MaterialReturnStatus::Completed {
            return None;
        }
        Some(LedgerEffect::increase(
            self.lines
                .iter()
                .filter(|line| line.is_good())
                .map(|line| {
                    line.ledger_entry(
                        DocumentKind::MaterialReturn,
                        self.header.id,
                        self.warehouse_id,
                        MovementKind::Return,
                    )
                })
                .collect(),
        ))
    }
}
