//! Gate pass: authorises goods physically leaving the premises.
//!
//! Gate passes never touch stock. A returnable pass can be closed by
//! `returned` once the goods come back; a non-returnable pass ends at
//! `released`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainError, DomainResult, WarehouseId};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{DocumentLine, NewLine, ensure_has_lines, number_lines, require_text};

workflow_status! {
    pub enum GatePassStatus for DocumentKind::GatePass {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Released => "released",
        Returned => "returned",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePassType {
    Returnable,
    NonReturnable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGatePass {
    pub warehouse_id: WarehouseId,
    pub pass_type: GatePassType,
    pub purpose: String,
    pub carrier: Option<String>,
    pub vehicle_no: Option<String>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub lines: Vec<NewLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatePassPatch {
    pub warehouse_id: Option<WarehouseId>,
    pub pass_type: Option<GatePassType>,
    pub purpose: Option<String>,
    pub carrier: Option<String>,
    pub vehicle_no: Option<String>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub lines: Option<Vec<NewLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePass {
    header: DocumentHeader,
    status: GatePassStatus,
    warehouse_id: WarehouseId,
    pass_type: GatePassType,
    purpose: String,
    carrier: Option<String>,
    vehicle_no: Option<String>,
    expected_return_at: Option<DateTime<Utc>>,
    lines: Vec<DocumentLine>,
    approved_by: Option<ActorId>,
    released_at: Option<DateTime<Utc>>,
    returned_at: Option<DateTime<Utc>>,
}

impl GatePass {
    pub fn create(header: DocumentHeader, input: NewGatePass) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: GatePassStatus::Draft,
            warehouse_id: input.warehouse_id,
            pass_type: input.pass_type,
            purpose: require_text("purpose", &input.purpose)?,
            carrier: input.carrier,
            vehicle_no: input.vehicle_no,
            expected_return_at: input.expected_return_at,
            lines: number_lines(input.lines)?,
            approved_by: None,
            released_at: None,
            returned_at: None,
        })
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn pass_type(&self) -> GatePassType {
        self.pass_type
    }

    pub fn is_returnable(&self) -> bool {
        self.pass_type == GatePassType::Returnable
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    pub fn vehicle_no(&self) -> Option<&str> {
        self.vehicle_no.as_deref()
    }

    pub fn expected_return_at(&self) -> Option<DateTime<Utc>> {
        self.expected_return_at
    }

    pub fn lines(&self) -> &[DocumentLine] {
        &self.lines
    }

    pub fn approved_by(&self) -> Option<ActorId> {
        self.approved_by
    }

    pub fn released_at(&self) -> Option<DateTime<Utc>> {
        self.released_at
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }
}

impl Document for GatePass {
    type Status = GatePassStatus;
    type Patch = GatePassPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> GatePassStatus {
        self.status
    }

    fn set_status(&mut self, status: GatePassStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: GatePassPatch) -> DomainResult<()> {
        let purpose = patch
            .purpose
            .as_deref()
            .map(|p| require_text("purpose", p))
            .transpose()?;
        let lines = patch.lines.map(number_lines).transpose()?;

        if let Some(purpose) = purpose {
            self.purpose = purpose;
        }
        if let Some(lines) = lines {
            self.lines = lines;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(pass_type) = patch.pass_type {
            self.pass_type = pass_type;
        }
        if patch.carrier.is_some() {
            self.carrier = patch.carrier;
        }
        if patch.vehicle_no.is_some() {
            self.vehicle_no = patch.vehicle_no;
        }
        if patch.expected_return_at.is_some() {
            self.expected_return_at = patch.expected_return_at;
        }
        Ok(())
    }

    fn check_entry(&self, to: GatePassStatus, _ctx: &ActionContext) -> DomainResult<()> {
        match to {
            GatePassStatus::Pending => {
                ensure_has_lines(DocumentKind::GatePass, self.number(), &self.lines)?;
                if self.is_returnable() && self.expected_return_at.is_none() {
                    return Err(DomainError::validation(
                        "returnable gate pass needs an expected return date",
                    ));
                }
                Ok(())
            }
            GatePassStatus::Returned if !self.is_returnable() => Err(DomainError::invariant(
                format!("gate pass {} is not returnable", self.number()),
            )),
            _ => Ok(()),
        }
    }

    fn on_entry(&mut self, to: GatePassStatus, ctx: &ActionContext) {
        match to {
            GatePassStatus::Approved => self.approved_by = Some(ctx.actor_id),
            GatePassStatus::Released => self.released_at = Some(ctx.occurred_at),
            GatePassStatus::Returned => self.returned_at = Some(ctx.occurred_at),
            _ => {}
        }
    }
}
