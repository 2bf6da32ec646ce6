//! Stock transfer note: moves stock between two warehouses.
//!
//! Shipping decreases the source, receiving increases the destination. In
//! between, the quantity is in transit and counted at neither warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainError, DomainResult, WarehouseId};
use stockyard_inventory::{LedgerEffect, LedgerEntry, MovementKind};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{DocumentLine, NewLine, ensure_has_lines, number_lines};

workflow_status! {
    pub enum StockTransferStatus for DocumentKind::StockTransfer {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Shipped => "shipped",
        Received => "received",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockTransfer {
    pub source_warehouse_id: WarehouseId,
    pub destination_warehouse_id: WarehouseId,
    pub notes: Option<String>,
    pub lines: Vec<NewLine>,
}

/// Field changes; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockTransferPatch {
    pub source_warehouse_id: Option<WarehouseId>,
    pub destination_warehouse_id: Option<WarehouseId>,
    pub notes: Option<String>,
    pub lines: Option<Vec<NewLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransfer {
    header: DocumentHeader,
    status: StockTransferStatus,
    source_warehouse_id: WarehouseId,
    destination_warehouse_id: WarehouseId,
    notes: Option<String>,
    lines: Vec<DocumentLine>,
    approved_by: Option<ActorId>,
    shipped_at: Option<DateTime<Utc>>,
    received_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl StockTransfer {
    pub fn create(header: DocumentHeader, input: NewStockTransfer) -> DomainResult<Self> {
        ensure_distinct(input.source_warehouse_id, input.destination_warehouse_id)?;
        Ok(Self {
            header,
            status: StockTransferStatus::Draft,
            source_warehouse_id: input.source_warehouse_id,
            destination_warehouse_id: input.destination_warehouse_id,
            notes: input.notes,
            lines: number_lines(input.lines)?,
            approved_by: None,
            shipped_at: None,
            received_at: None,
            completed_at: None,
        })
    }

    pub fn source_warehouse_id(&self) -> WarehouseId {
        self.source_warehouse_id
    }

    pub fn destination_warehouse_id(&self) -> WarehouseId {
        self.destination_warehouse_id
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn entries_at(&self, warehouse_id: WarehouseId, movement: MovementKind) -> Vec<LedgerEntry> {
        self.lines
            .iter()
            .map(|line| {
                line.ledger_entry(
                    DocumentKind::StockTransfer,
                    self.header.id,
                    warehouse_id,
                    movement,
                )
            })
            .collect()
    }
}

fn ensure_distinct(source: WarehouseId, destination: WarehouseId) -> DomainResult<()> {
    if source == destination {
        return Err(DomainError::validation(
            "source and destination warehouse must differ",
        ));
    }
    Ok(())
}

impl Document for StockTransfer {
    type Status = StockTransferStatus;
    type Patch = StockTransferPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> StockTransferStatus {
        self.status
    }

    fn set_status(&mut self, status: StockTransferStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: StockTransferPatch) -> DomainResult<()> {
        let source = patch.source_warehouse_id.unwrap_or(self.source_warehouse_id);
        let destination = patch
            .destination_warehouse_id
            .unwrap_or(self.destination_warehouse_id);
        ensure_distinct(source, destination)?;
        let lines = patch.lines.map(number_lines).transpose()?;

        self.source_warehouse_id = source;
        self.destination_warehouse_id = destination;
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        if let Some(lines) = lines {
            self.lines = lines;
        }
        Ok(())
    }

    fn check_entry(&self, to: StockTransferStatus, _ctx: &ActionContext) -> DomainResult<()> {
        if to == StockTransferStatus::Pending {
            ensure_has_lines(DocumentKind::StockTransfer, self.number(), &self.lines)?;
        }
        Ok(())
    }

    fn on_entry(&mut self, to: StockTransferStatus, ctx: &ActionContext) {
        match to {
            StockTransferStatus::Approved => self.approved_by = Some(ctx.actor_id),
            StockTransferStatus::Shipped => self.shipped_at = Some(ctx.occurred_at),
            StockTransferStatus::Received => self.received_at = Some(ctx.occurred_at),
            StockTransferStatus::Completed => self.completed_at = Some(ctx.occurred_at),
            _ => {}
        }
    }

    fn ledger_effect(&self, to: StockTransferStatus) -> Option<LedgerEffect> {
        match to {
            StockTransferStatus::Shipped => Some(LedgerEffect::decrease(
                self.entries_at(self.source_warehouse_id, MovementKind::TransferOut),
            )),
            StockTransferStatus::Received => Some(LedgerEffect::increase(
                self.entries_at(self.destination_warehouse_id, MovementKind::TransferIn),
            )),
            _ => None,
        }
    }
}
