//! Goods receipt note: stock arriving at a warehouse from outside.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainError, DomainResult, WarehouseId};
use stockyard_inventory::{LedgerEffect, LedgerEntry, MovementKind, MovementReference};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{DocumentLine, NewLine, ensure_has_lines, number_lines};

workflow_status! {
    pub enum GoodsReceiptStatus for DocumentKind::GoodsReceipt {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// A received line with the part of it rejected at inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    #[serde(flatten)]
    pub line: DocumentLine,
    pub rejected_quantity: Decimal,
}

impl ReceiptLine {
    /// Quantity that goes into stock.
    pub fn accepted_quantity(&self) -> Decimal {
        self.line.quantity.value() - self.rejected_quantity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReceiptLine {
    #[serde(flatten)]
    pub line: NewLine,
    #[serde(default)]
    pub rejected_quantity: Decimal,
}

impl From<NewLine> for NewReceiptLine {
    fn from(line: NewLine) -> Self {
        Self {
            line,
            rejected_quantity: Decimal::ZERO,
        }
    }
}

impl NewReceiptLine {
    pub fn rejected(mut self, quantity: Decimal) -> Self {
        self.rejected_quantity = quantity;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGoodsReceipt {
    pub warehouse_id: WarehouseId,
    pub supplier_reference: Option<String>,
    pub lines: Vec<NewReceiptLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodsReceiptPatch {
    pub warehouse_id: Option<WarehouseId>,
    pub supplier_reference: Option<String>,
    pub lines: Option<Vec<NewReceiptLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsReceipt {
    header: DocumentHeader,
    status: GoodsReceiptStatus,
    warehouse_id: WarehouseId,
    supplier_reference: Option<String>,
    lines: Vec<ReceiptLine>,
    approved_by: Option<ActorId>,
    completed_at: Option<DateTime<Utc>>,
}

fn receipt_lines(lines: Vec<NewReceiptLine>) -> DomainResult<Vec<ReceiptLine>> {
    let (base, rejected): (Vec<NewLine>, Vec<Decimal>) = lines
        .into_iter()
        .map(|l| (l.line, l.rejected_quantity))
        .unzip();
    number_lines(base)?
        .into_iter()
        .zip(rejected)
        .map(|(line, rejected_quantity)| {
            if rejected_quantity < Decimal::ZERO || rejected_quantity > line.quantity.value() {
                return Err(DomainError::invalid_quantity(format!(
                    "line {}: rejected quantity {rejected_quantity} must be between 0 and {}",
                    line.line_no, line.quantity
                )));
            }
            Ok(ReceiptLine {
                line,
                rejected_quantity,
            })
        })
        .collect()
}

impl GoodsReceipt {
    pub fn create(header: DocumentHeader, input: NewGoodsReceipt) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: GoodsReceiptStatus::Draft,
            warehouse_id: input.warehouse_id,
            supplier_reference: input.supplier_reference,
            lines: receipt_lines(input.lines)?,
            approved_by: None,
            completed_at: None,
        })
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn supplier_reference(&self) -> Option<&str> {
        self.supplier_reference.as_deref()
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

impl Document for GoodsReceipt {
    type Status = GoodsReceiptStatus;
    type Patch = GoodsReceiptPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> GoodsReceiptStatus {
        self.status
    }

    fn set_status(&mut self, status: GoodsReceiptStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: GoodsReceiptPatch) -> DomainResult<()> {
        if let Some(lines) = patch.lines {
            self.lines = receipt_lines(lines)?;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(reference) = patch.supplier_reference {
            self.supplier_reference = Some(reference);
        }
        Ok(())
    }

    fn check_entry(&self, to: GoodsReceiptStatus, _ctx: &ActionContext) -> DomainResult<()> {
        if to == GoodsReceiptStatus::Pending {
            ensure_has_lines(DocumentKind::GoodsReceipt, self.number(), &self.lines)?;
        }
        Ok(())
    }

    fn on_entry(&mut self, to: GoodsReceiptStatus, ctx: &ActionContext) {
        match to {
            GoodsReceiptStatus::Approved => self.approved_by = Some(ctx.actor_id),
            GoodsReceiptStatus::Completed => self.completed_at = Some(ctx.occurred_at),
            _ => {}
        }
    }

    fn ledger_effect(&self, to: GoodsReceiptStatus) -> Option<LedgerEffect> {
        if to != GoodsReceiptStatus::Completed {
            return None;
        }
        let entries = self
            .lines
            .iter()
            .filter(|l| l.accepted_quantity() > Decimal::ZERO)
            .map(|l| {
                LedgerEntry::new(
                    l.line.item_id,
                    self.warehouse_id,
                    l.accepted_quantity(),
                    MovementKind::Receipt,
                )
                .with_reference(
                    MovementReference::new(DocumentKind::GoodsReceipt.as_str(), self.header.id)
                        .line(l.line.line_no),
                )
            })
            .collect();
        Some(LedgerEffect::increase(entries))
    }
}
