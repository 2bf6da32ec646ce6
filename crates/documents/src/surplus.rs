//! Surplus item: stock identified as excess, evaluated for disposition.
//!
//! The disposition chosen at evaluation decides what actioning does: a
//! transfer or return spawns a draft follow-up document, a sale spawns
//! nothing. Approval is held back until the review period has elapsed
//! since evaluation.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{
    ActionContext, ActorId, DomainError, DomainResult, ItemId, Quantity, WarehouseId,
};
use stockyard_workflow::{DocumentKind, ensure_transition, workflow_status};

use crate::document::{Document, DocumentHeader, SpawnedDocument};
use crate::line::{Condition, NewLine, require_text};
use crate::material_return::NewMaterialReturn;
use crate::stock_transfer::NewStockTransfer;

workflow_status! {
    pub enum SurplusStatus for DocumentKind::SurplusItem {
        Identified => "identified",
        Evaluated => "evaluated",
        Approved => "approved",
        Actioned => "actioned",
        Closed => "closed",
    }
}

/// What to do with the surplus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Disposition {
    /// Move to another warehouse that needs it.
    Transfer { destination_warehouse_id: WarehouseId },
    /// Return into stock at `warehouse_id`.
    Return { warehouse_id: WarehouseId },
    Sell { buyer: Option<String> },
}

/// Follow-up document to create when a surplus item is actioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnRequest {
    StockTransfer(NewStockTransfer),
    MaterialReturn(NewMaterialReturn),
}

impl SpawnRequest {
    pub fn kind(&self) -> DocumentKind {
        match self {
            SpawnRequest::StockTransfer(_) => DocumentKind::StockTransfer,
            SpawnRequest::MaterialReturn(_) => DocumentKind::MaterialReturn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSurplusItem {
    pub warehouse_id: WarehouseId,
    pub item_id: ItemId,
    pub quantity: Decimal,
    pub unit_of_measure: String,
    #[serde(default)]
    pub condition: Condition,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurplusItemPatch {
    pub warehouse_id: Option<WarehouseId>,
    pub item_id: Option<ItemId>,
    pub quantity: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub condition: Option<Condition>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurplusItem {
    header: DocumentHeader,
    status: SurplusStatus,
    warehouse_id: WarehouseId,
    item_id: ItemId,
    quantity: Quantity,
    unit_of_measure: String,
    condition: Condition,
    reason: Option<String>,
    disposition: Option<Disposition>,
    evaluated_by: Option<ActorId>,
    evaluated_at: Option<DateTime<Utc>>,
    approved_by: Option<ActorId>,
    approved_at: Option<DateTime<Utc>>,
    actioned_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    spawned: Option<SpawnedDocument>,
}

impl SurplusItem {
    pub fn create(header: DocumentHeader, input: NewSurplusItem) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: SurplusStatus::Identified,
            warehouse_id: input.warehouse_id,
            item_id: input.item_id,
            quantity: Quantity::new(input.quantity)?,
            unit_of_measure: require_text("unit of measure", &input.unit_of_measure)?,
            condition: input.condition,
            reason: input.reason,
            disposition: None,
            evaluated_by: None,
            evaluated_at: None,
            approved_by: None,
            approved_at: None,
            actioned_at: None,
            closed_at: None,
            spawned: None,
        })
    }

    /// Record the disposition and move to `evaluated`.
    pub fn evaluate(
        &mut self,
        disposition: Disposition,
        ctx: &ActionContext,
    ) -> DomainResult<SurplusStatus> {
        if let Disposition::Transfer {
            destination_warehouse_id,
        } = &disposition
        {
            if *destination_warehouse_id == self.warehouse_id {
                return Err(DomainError::validation(
                    "surplus transfer destination must differ from its warehouse",
                ));
            }
        }
        let from = self.transition(SurplusStatus::Evaluated, ctx)?;
        self.disposition = Some(disposition);
        Ok(from)
    }

    /// Earliest time approval is allowed; `None` before evaluation or when
    /// the period runs past the representable calendar.
    pub fn review_due_at(&self, review_period: Duration) -> Option<DateTime<Utc>> {
        self.evaluated_at?.checked_add_signed(review_period)
    }

    /// Approve once `review_period` has elapsed since evaluation.
    pub fn approve(
        &mut self,
        review_period: Duration,
        ctx: &ActionContext,
    ) -> DomainResult<SurplusStatus> {
        ensure_transition(self.status, SurplusStatus::Approved)?;
        if self.evaluated_at.is_none() {
            return Err(DomainError::invariant(format!(
                "surplus {} has no evaluation date",
                self.number()
            )));
        }
        match self.review_due_at(review_period) {
            Some(due) if ctx.occurred_at >= due => {}
            Some(due) => {
                return Err(DomainError::precondition(format!(
                    "surplus {} is under review until {due}",
                    self.number()
                )));
            }
            None => {
                return Err(DomainError::precondition(format!(
                    "surplus {} review period of {} days never elapses",
                    self.number(),
                    review_period.num_days()
                )));
            }
        }
        self.transition(SurplusStatus::Approved, ctx)
    }

    /// Follow-up document implied by the disposition, if any.
    pub fn spawn_request(&self) -> Option<SpawnRequest> {
        let line = NewLine::new(self.item_id, self.quantity.value(), self.unit_of_measure.clone())
            .condition(self.condition);
        let note = Some(format!("surplus {}", self.number()));
        match self.disposition.as_ref()? {
            Disposition::Transfer {
                destination_warehouse_id,
            } => Some(SpawnRequest::StockTransfer(NewStockTransfer {
                source_warehouse_id: self.warehouse_id,
                destination_warehouse_id: *destination_warehouse_id,
                notes: note,
                lines: vec![line],
            })),
            Disposition::Return { warehouse_id } => {
                Some(SpawnRequest::MaterialReturn(NewMaterialReturn {
                    warehouse_id: *warehouse_id,
                    reason: note,
                    lines: vec![line],
                }))
            }
            Disposition::Sell { .. } => None,
        }
    }

    pub fn record_spawned(&mut self, spawned: SpawnedDocument) {
        self.spawned = Some(spawned);
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn disposition(&self) -> Option<&Disposition> {
        self.disposition.as_ref()
    }

    pub fn evaluated_at(&self) -> Option<DateTime<Utc>> {
        self.evaluated_at
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn actioned_at(&self) -> Option<DateTime<Utc>> {
        self.actioned_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn spawned(&self) -> Option<&SpawnedDocument> {
        self.spawned.as_ref()
    }
}

impl Document for SurplusItem {
    type Status = SurplusStatus;
    type Patch = SurplusItemPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> SurplusStatus {
        self.status
    }

    fn set_status(&mut self, status: SurplusStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: SurplusItemPatch) -> DomainResult<()> {
        let quantity = patch.quantity.map(Quantity::new).transpose()?;
        let unit_of_measure = patch
            .unit_of_measure
            .as_deref()
            .map(|u| require_text("unit of measure", u))
            .transpose()?;

        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(unit_of_measure) = unit_of_measure {
            self.unit_of_measure = unit_of_measure;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(item_id) = patch.item_id {
            self.item_id = item_id;
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        if let Some(reason) = patch.reason {
            self.reason = Some(reason);
        }
        Ok(())
    }

    fn check_entry(&self, to: SurplusStatus, _ctx: &ActionContext) -> DomainResult<()> {
        if to == SurplusStatus::Actioned && self.disposition.is_none() {
            return Err(DomainError::invariant(format!(
                "surplus {} has no disposition",
                self.number()
            )));
        }
        Ok(())
    }

    fn on_entry(&mut self, to: SurplusStatus, ctx: &ActionContext) {
        match to {
            SurplusStatus::Evaluated => {
                self.evaluated_by = Some(ctx.actor_id);
                self.evaluated_at = Some(ctx.occurred_at);
            }
            SurplusStatus::Approved => {
                self.approved_by = Some(ctx.actor_id);
                self.approved_at = Some(ctx.occurred_at);
            }
            SurplusStatus::Actioned => self.actioned_at = Some(ctx.occurred_at),
            SurplusStatus::Closed => self.closed_at = Some(ctx.occurred_at),
            SurplusStatus::Identified => {}
        }
    }
}

impl core::fmt::Display for Disposition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Disposition::Transfer { .. } => f.write_str("transfer"),
            Disposition::Return { .. } => f.write_str("return"),
            Disposition::Sell { .. } => f.write_str("sell"),
        }
    }
}
