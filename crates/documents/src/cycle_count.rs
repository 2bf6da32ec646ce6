//! Cycle count: periodic physical verification of a warehouse's stock.
//!
//! Starting the count snapshots each item's system quantity. Counts are
//! entered while in progress; applying adjustments sets on-hand to the
//! counted quantity wherever it differs from the snapshot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{ActionContext, DomainError, DomainResult, ItemId, WarehouseId};
use stockyard_inventory::{LedgerEffect, LedgerEntry, MovementKind, MovementReference};
use stockyard_workflow::{DocumentKind, workflow_status};

use crate::document::{Document, DocumentHeader};
use crate::line::{ensure_has_lines, require_text};

workflow_status! {
    pub enum CycleCountStatus for DocumentKind::CycleCount {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Adjusted => "adjusted",
        Cancelled => "cancelled",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub unit_of_measure: String,
    pub system_quantity: Option<Decimal>,
    pub counted_quantity: Option<Decimal>,
}

impl CountLine {
    /// `counted - system`, once both are known.
    pub fn variance(&self) -> Option<Decimal> {
        Some(self.counted_quantity? - self.system_quantity?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCountLine {
    pub item_id: ItemId,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCycleCount {
    pub warehouse_id: WarehouseId,
    pub scheduled_for: DateTime<Utc>,
    pub lines: Vec<NewCountLine>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleCountPatch {
    pub warehouse_id: Option<WarehouseId>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub lines: Option<Vec<NewCountLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCount {
    header: DocumentHeader,
    status: CycleCountStatus,
    warehouse_id: WarehouseId,
    scheduled_for: DateTime<Utc>,
    lines: Vec<CountLine>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    adjusted_at: Option<DateTime<Utc>>,
}

fn count_lines(lines: Vec<NewCountLine>) -> DomainResult<Vec<CountLine>> {
    let mut seen = Vec::with_capacity(lines.len());
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let line_no = idx as u32 + 1;
            if seen.contains(&line.item_id) {
                return Err(DomainError::validation(format!(
                    "line {line_no}: item {} is already counted on this document",
                    line.item_id
                )));
            }
            seen.push(line.item_id);
            Ok(CountLine {
                line_no,
                item_id: line.item_id,
                unit_of_measure: require_text("unit of measure", &line.unit_of_measure)?,
                system_quantity: None,
                counted_quantity: None,
            })
        })
        .collect()
}

impl CycleCount {
    pub fn create(header: DocumentHeader, input: NewCycleCount) -> DomainResult<Self> {
        Ok(Self {
            header,
            status: CycleCountStatus::Scheduled,
            warehouse_id: input.warehouse_id,
            scheduled_for: input.scheduled_for,
            lines: count_lines(input.lines)?,
            started_at: None,
            completed_at: None,
            adjusted_at: None,
        })
    }

    /// Move to `in_progress`, snapshotting system quantities.
    ///
    /// Items absent from `on_hand` have never moved and snapshot as zero.
    pub fn start(
        &mut self,
        on_hand: &HashMap<ItemId, Decimal>,
        ctx: &ActionContext,
    ) -> DomainResult<CycleCountStatus> {
        let from = self.transition(CycleCountStatus::InProgress, ctx)?;
        for line in &mut self.lines {
            line.system_quantity = Some(on_hand.get(&line.item_id).copied().unwrap_or_default());
        }
        Ok(from)
    }

    /// Enter the physical count for one line.
    pub fn record_count(
        &mut self,
        line_no: u32,
        counted: Decimal,
        ctx: &ActionContext,
    ) -> DomainResult<()> {
        if self.status != CycleCountStatus::InProgress {
            return Err(DomainError::invariant(format!(
                "cycle count {} accepts counts only while in progress (status {})",
                self.number(),
                self.status
            )));
        }
        if counted < Decimal::ZERO {
            return Err(DomainError::invalid_quantity(format!(
                "counted quantity {counted} is negative"
            )));
        }
        let number = self.header.number.clone();
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.line_no == line_no)
            .ok_or_else(|| DomainError::not_found(format!("cycle count {number} line {line_no}")))?;
        line.counted_quantity = Some(counted);
        self.header.updated_by = ctx.actor_id;
        self.header.updated_at = ctx.occurred_at;
        Ok(())
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn scheduled_for(&self) -> DateTime<Utc> {
        self.scheduled_for
    }

    pub fn lines(&self) -> &[CountLine] {
        &self.lines
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.lines.iter().map(|l| l.item_id).collect()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn adjusted_at(&self) -> Option<DateTime<Utc>> {
        self.adjusted_at
    }
}

impl Document for CycleCount {
    type Status = CycleCountStatus;
    type Patch = CycleCountPatch;

    fn header(&self) -> &DocumentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut DocumentHeader {
        &mut self.header
    }

    fn status(&self) -> CycleCountStatus {
        self.status
    }

    fn set_status(&mut self, status: CycleCountStatus) {
        self.status = status;
    }

    fn apply_changes(&mut self, patch: CycleCountPatch) -> DomainResult<()> {
        if let Some(lines) = patch.lines {
            self.lines = count_lines(lines)?;
        }
        if let Some(warehouse_id) = patch.warehouse_id {
            self.warehouse_id = warehouse_id;
        }
        if let Some(scheduled_for) = patch.scheduled_for {
            self.scheduled_for = scheduled_for;
        }
        Ok(())
    }

    fn check_entry(&self, to: CycleCountStatus, _ctx: &ActionContext) -> DomainResult<()> {
        match to {
            CycleCountStatus::InProgress => {
                ensure_has_lines(DocumentKind::CycleCount, self.number(), &self.lines)
            }
            CycleCountStatus::Completed => {
                let uncounted: Vec<String> = self
                    .lines
                    .iter()
                    .filter(|l| l.counted_quantity.is_none())
                    .map(|l| l.line_no.to_string())
                    .collect();
                if uncounted.is_empty() {
                    Ok(())
                } else {
                    Err(DomainError::validation(format!(
                        "cycle count {} has uncounted lines: {}",
                        self.number(),
                        uncounted.join(", ")
                    )))
                }
            }
            _ => Ok(()),
        }
    }

    fn on_entry(&mut self, to: CycleCountStatus, ctx: &ActionContext) {
        match to {
            CycleCountStatus::InProgress => self.started_at = Some(ctx.occurred_at),
            CycleCountStatus::Completed => self.completed_at = Some(ctx.occurred_at),
            CycleCountStatus::Adjusted => self.adjusted_at = Some(ctx.occurred_at),
            _ => {}
        }
    }

    fn ledger_effect(&self, to: CycleCountStatus) -> Option<LedgerEffect> {
        if to != CycleCountStatus::Adjusted {
            return None;
        }
        let entries = self
            .lines
            .iter()
            .filter(|l| l.variance().is_some_and(|v| !v.is_zero()))
            .filter_map(|l| {
                let counted = l.counted_quantity?;
                Some(
                    LedgerEntry::new(l.item_id, self.warehouse_id, counted, MovementKind::Adjustment)
                        .with_reference(
                            MovementReference::new(DocumentKind::CycleCount.as_str(), self.header.id)
                                .line(l.line_no),
                        ),
                )
            })
            .collect();
        Some(LedgerEffect::set_absolute(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ctx, header};
    use rust_decimal_macros::dec;
    use stockyard_inventory::PostingKind;

    fn count(items: &[ItemId]) -> CycleCount {
        CycleCount::create(
            header(DocumentKind::CycleCount),
            NewCycleCount {
                warehouse_id: WarehouseId::new(),
                scheduled_for: ctx().occurred_at,
                lines: items
                    .iter()
                    .map(|&item_id| NewCountLine {
                        item_id,
                        unit_of_measure: "ea".into(),
                    })
                    .collect(),
            },
        )
        .unwrap()
    }

    #[test]
    fn start_snapshots_system_quantities() {
        let (a, b) = (ItemId::new(), ItemId::new());
        let mut doc = count(&[a, b]);
        doc.start(&HashMap::from([(a, dec!(40))]), &ctx()).unwrap();

        assert_eq!(doc.lines()[0].system_quantity, Some(dec!(40)));
        assert_eq!(doc.lines()[1].system_quantity, Some(dec!(0)));
        assert!(doc.started_at().is_some());
    }

    #[test]
    fn counts_are_only_recorded_in_progress() {
        let mut doc = count(&[ItemId::new()]);
        let err = doc.record_count(1, dec!(3), &ctx()).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        doc.start(&HashMap::new(), &ctx()).unwrap();
        assert!(matches!(
            doc.record_count(1, dec!(-1), &ctx()),
            Err(DomainError::InvalidQuantity(_))
        ));
        assert!(matches!(
            doc.record_count(9, dec!(1), &ctx()),
            Err(DomainError::NotFound(_))
        ));
        doc.record_count(1, dec!(0), &ctx()).unwrap();
    }

    #[test]
    fn completion_requires_every_line_counted() {
        let (a, b) = (ItemId::new(), ItemId::new());
        let mut doc = count(&[a, b]);
        doc.start(&HashMap::new(), &ctx()).unwrap();
        doc.record_count(1, dec!(5), &ctx()).unwrap();

        assert!(matches!(
            doc.transition(CycleCountStatus::Completed, &ctx()),
            Err(DomainError::Validation(_))
        ));
        doc.record_count(2, dec!(5), &ctx()).unwrap();
        doc.transition(CycleCountStatus::Completed, &ctx()).unwrap();
        assert!(matches!(
            doc.record_count(2, dec!(6), &ctx()),
            Err(DomainError::InvariantViolation(_))
        ));
    }

    #[test]
    fn adjustments_cover_only_lines_with_variance() {
        let (a, b, c) = (ItemId::new(), ItemId::new(), ItemId::new());
        let mut doc = count(&[a, b, c]);
        doc.start(
            &HashMap::from([(a, dec!(10)), (b, dec!(4)), (c, dec!(7))]),
            &ctx(),
        )
        .unwrap();
        doc.record_count(1, dec!(8), &ctx()).unwrap();
        doc.record_count(2, dec!(4), &ctx()).unwrap();
        doc.record_count(3, dec!(9), &ctx()).unwrap();
        doc.transition(CycleCountStatus::Completed, &ctx()).unwrap();

        let effect = doc.ledger_effect(CycleCountStatus::Adjusted).unwrap();
        assert_eq!(effect.posting, PostingKind::SetAbsolute);
        let set: Vec<_> = effect.entries.iter().map(|e| (e.item_id, e.quantity)).collect();
        assert_eq!(set, vec![(a, dec!(8)), (c, dec!(9))]);
        assert_eq!(doc.lines()[0].variance(), Some(dec!(-2)));
    }

    #[test]
    fn duplicate_items_are_rejected() {
        let a = ItemId::new();
        let result = CycleCount::create(
            header(DocumentKind::CycleCount),
            NewCycleCount {
                warehouse_id: WarehouseId::new(),
                scheduled_for: ctx().occurred_at,
                lines: vec![
                    NewCountLine {
                        item_id: a,
                        unit_of_measure: "ea".into(),
                    },
                    NewCountLine {
                        item_id: a,
                        unit_of_measure: "ea".into(),
                    },
                ],
            },
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn cancellation_stops_at_completed() {
        let mut scheduled = count(&[ItemId::new()]);
        scheduled.transition(CycleCountStatus::Cancelled, &ctx()).unwrap();

        let mut done = count(&[ItemId::new()]);
        done.start(&HashMap::new(), &ctx()).unwrap();
        done.record_count(1, dec!(1), &ctx()).unwrap();
        done.transition(CycleCountStatus::Completed, &ctx()).unwrap();
        assert!(matches!(
            done.transition(CycleCountStatus::Cancelled, &ctx()),
            Err(DomainError::InvalidTransition { .. })
        ));
    }
}
