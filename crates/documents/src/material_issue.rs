//! Material issue voucher: stock handed out of a warehouse for consumption.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainResult, WarehouseId};
use stockyard_inventory::{LedgerEffect, MovementKind};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{DocumentLine, NewLine, ensure_has_lines, number_lines};

workflow_status! {
    pub enum MaterialIssueStatus for DocumentKind::MaterialIssue {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Issued => "issued",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMaterialIssue {
    pub warehouse_id: WarehouseId,
    /// Department, job or cost centre the material is issued to.
    pub issued_to: String,
    pub lines: Vec<NewLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialIssuePatch {
    pub warehouse_id: Option<WarehouseId>,
    pub issued_to: Option<String>,
    pub lines: Option<Vec<NewLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialIssue {
    header: DocumentHeader,
    status: MaterialIssueStatus,
    warehouse_id: WarehouseId,
    issued_to: String,
    lines: Vec<DocumentLine>,
    approved_by: Option<ActorId>,
    issued_at: Option<DateTime<Utc>>,
}

impl MaterialIssue {
    pub fn create(header: DocumentHeader, input: NewMaterialIssue) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: MaterialIssueStatus::Draft,
            warehouse_id: input.warehouse_id,
            issued_to: input.issued_to,
            lines: number_lines(input.lines)?,
            approved_by: None,
            issued_at: None,
        })
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn issued_to(&self) -> &str {
        &self.issued_to
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }
}

impl Document for MaterialIssue {
    type Status = MaterialIssueStatus;
    type Patch = MaterialIssuePatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> MaterialIssueStatus {
        self.status
    }

    fn set_status(&mut self, status: MaterialIssueStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: MaterialIssuePatch) -> DomainResult<()> {
        if let Some(lines) = patch.lines {
            self.lines = number_lines(lines)?;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(issued_to) = patch.issued_to {
            self.issued_to = issued_to;
        }
        Ok(())
    }

    fn check_entry(&self, to: MaterialIssueStatus, _ctx: &ActionContext) -> DomainResult<()> {
        if to == MaterialIssueStatus::Pending {
            ensure_has_lines(DocumentKind::MaterialIssue, self.number(), &self.lines)?;
        }
        Ok(())
    }

    fn on_entry(&mut self, to: MaterialIssueStatus, ctx: &ActionContext) {
        match to {
            MaterialIssueStatus::Approved => self.approved_by = Some(ctx.actor_id),
            MaterialIssueStatus::Issued => self.issued_at = Some(ctx.occurred_at),
            _ => {}
        }
    }

    fn ledger_effect(&self, to: MaterialIssueStatus) -> Option<LedgerEffect> {
        (to == MaterialIssueStatus::Issued).then(|| {
            LedgerEffect::decrease(
                self.lines
                    .iter()
                    .map(|line| {
                        line.ledger_entry(
                            DocumentKind::MaterialIssue,
                            self.header.id,
                            self.warehouse_id,
                            MovementKind::Issue,
                        )
                    })
                    .collect(),
            )
        })
    }
}
