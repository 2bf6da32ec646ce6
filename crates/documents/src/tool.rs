//! Tool register entry: a tracked, reusable asset with a custodian while
//! checked out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, ActorId, DomainError, DomainResult, WarehouseId};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::require_text;

workflow_status! {
    pub enum ToolStatus for DocumentKind::Tool {
        Draft => "draft",
        Pending => "pending",
        Active => "active",
        CheckedOut => "checked_out",
        Maintenance => "maintenance",
        Retired => "retired",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTool {
    pub name: String,
    pub serial_number: String,
    pub category: Option<String>,
    pub home_warehouse_id: WarehouseId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPatch {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub home_warehouse_id: Option<WarehouseId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    header: DocumentHeader,
    status: ToolStatus,
    name: String,
    serial_number: String,
    category: Option<String>,
    home_warehouse_id: WarehouseId,
    custodian: Option<ActorId>,
    checked_out_at: Option<DateTime<Utc>>,
    due_back_at: Option<DateTime<Utc>>,
    maintenance_note: Option<String>,
    retired_at: Option<DateTime<Utc>>,
}

impl Tool {
    pub fn create(header: DocumentHeader, input: NewTool) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: ToolStatus::Draft,
            name: require_text("name", &input.name)?,
            serial_number: require_text("serial number", &input.serial_number)?,
            category: input.category,
            home_warehouse_id: input.home_warehouse_id,
            custodian: None,
            checked_out_at: None,
            due_back_at: None,
            maintenance_note: None,
            retired_at: None,
        })
    }

    /// Hand the tool to `custodian`.
    pub fn check_out(
        &mut self,
        custodian: ActorId,
        due_back_at: Option<DateTime<Utc>>,
        ctx: &ActionContext,
    ) -> DomainResult<ToolStatus> {
        if due_back_at.is_some_and(|due| due <= ctx.occurred_at) {
            return Err(DomainError::validation("due-back time must be in the future"));
        }
        let from = self.transition(ToolStatus::CheckedOut, ctx)?;
        self.custodian = Some(custodian);
        self.due_back_at = due_back_at;
        Ok(from)
    }

    pub fn send_to_maintenance(
        &mut self,
        note: Option<String>,
        ctx: &ActionContext,
    ) -> DomainResult<ToolStatus> {
        let from = self.transition(ToolStatus::Maintenance, ctx)?;
        self.maintenance_note = note;
        Ok(from)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn home_warehouse_id(&self) -> WarehouseId {
        self.home_warehouse_id
    }

    pub fn custodian(&self) -> Option<ActorId> {
        self.custodian
    }

    pub fn checked_out_at(&self) -> Option<DateTime<Utc>> {
        self.checked_out_at
    }

    pub fn due_back_at(&self) -> Option<DateTime<Utc>> {
        self.due_back_at
    }

    pub fn maintenance_note(&self) -> Option<&str> {
        self.maintenance_note.as_deref()
    }

    pub fn retired_at(&self) -> Option<DateTime<Utc>> {
        self.retired_at
    }
}

impl Document for Tool {
    type Status = ToolStatus;
    type Patch = ToolPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> ToolStatus {
        self.status
    }

    fn set_status(&mut self, status: ToolStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: ToolPatch) -> DomainResult<()> {
        let name = patch
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?;
        let serial_number = patch
            .serial_number
            .as_deref()
            .map(|s| require_text("serial number", s))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(serial_number) = serial_number {
            self.serial_number = serial_number;
        }
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(home) = patch.home_warehouse_id {
            self.home_warehouse_id = home;
        }
        Ok(())
    }

    fn on_entry(&mut self, to: ToolStatus, ctx: &ActionContext) {
        match to {
            ToolStatus::CheckedOut => self.checked_out_at = Some(ctx.occurred_at),
            // back on the shelf
            ToolStatus::Active => {
                self.custodian = None;
                self.checked_out_at = None;
                self.due_back_at = None;
                self.maintenance_note = None;
            }
            ToolStatus::Retired => self.retired_at = Some(ctx.occurred_at),
            _ => {}
        }
    }
}
