use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{DocumentId, DomainError, DomainResult, ItemId, Quantity, WarehouseId};
use stockyard_inventory::{LedgerEntry, MovementKind, MovementReference};
use stockyard_workflow::DocumentKind;

/// Physical condition recorded on a line.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Good,
    Damaged,
    Rejected,
}

/// A numbered document line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub line_no: u32,
    pub item_id: ItemId,
    pub quantity: Quantity,
    pub unit_of_measure: String,
    pub condition: Condition,
}

impl DocumentLine {
    pub fn is_good(&self) -> bool {
        self.condition == Condition::Good
    }

    pub(crate) fn ledger_entry(
        &self,
        kind: DocumentKind,
        document_id: DocumentId,
        warehouse_id: WarehouseId,
        movement: MovementKind,
    ) -> LedgerEntry {
        LedgerEntry::new(self.item_id, warehouse_id, self.quantity.value(), movement)
            .with_reference(MovementReference::new(kind.as_str(), document_id).line(self.line_no))
    }
}

/// Line input for create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub item_id: ItemId,
    pub quantity: Decimal,
    pub unit_of_measure: String,
    #[serde(default)]
    pub condition: Condition,
}

impl NewLine {
    pub fn new(item_id: ItemId, quantity: Decimal, unit_of_measure: impl Into<String>) -> Self {
        Self {
            item_id,
            quantity,
            unit_of_measure: unit_of_measure.into(),
            condition: Condition::Good,
        }
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

/// Validate and number lines from 1.
pub(crate) fn number_lines(lines: Vec<NewLine>) -> DomainResult<Vec<DocumentLine>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| {
            let line_no = idx as u32 + 1;
            let quantity = Quantity::new(line.quantity)?;
            let unit_of_measure = line.unit_of_measure.trim().to_owned();
            if unit_of_measure.is_empty() {
                return Err(DomainError::validation(format!(
                    "line {line_no}: unit of measure is required"
                )));
            }
            Ok(DocumentLine {
                line_no,
                item_id: line.item_id,
                quantity,
                unit_of_measure,
                condition: line.condition,
            })
        })
        .collect()
}

pub(crate) fn ensure_has_lines<L>(kind: DocumentKind, number: &str, lines: &[L]) -> DomainResult<()> {
    if lines.is_empty() {
        Err(DomainError::validation(format!(
            "{kind} {number} has no lines"
        )))
    } else {
        Ok(())
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(DomainError::validation(format!("{field} is required")))
    } else {
        Ok(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lines_are_numbered_from_one() {
        let item = ItemId::new();
        let lines = number_lines(vec![
            NewLine::new(item, dec!(10), "ea"),
            NewLine::new(item, dec!(2.5), " kg ").condition(Condition::Damaged),
        ])
        .unwrap();

        assert_eq!(lines[0].line_no, 1);
        assert_eq!(lines[1].line_no, 2);
        assert_eq!(lines[1].unit_of_measure, "kg");
        assert!(!lines[1].is_good());
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        let item = ItemId::new();
        for qty in [dec!(0), dec!(-3)] {
            assert!(matches!(
                number_lines(vec![NewLine::new(item, qty, "ea")]),
                Err(DomainError::InvalidQuantity(_))
            ));
        }
    }

    #[test]
    fn unit_of_measure_is_required() {
        assert!(matches!(
            number_lines(vec![NewLine::new(ItemId::new(), dec!(1), "  ")]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn ledger_entries_reference_their_line() {
        let doc = DocumentId::new();
        let wh = WarehouseId::new();
        let line = &number_lines(vec![NewLine::new(ItemId::new(), dec!(4), "ea")]).unwrap()[0];

        let entry = line.ledger_entry(DocumentKind::StockTransfer, doc, wh, MovementKind::TransferOut);

        assert_eq!(entry.quantity, dec!(4));
        assert_eq!(entry.warehouse_id, wh);
        let reference = entry.reference.unwrap();
        assert_eq!(reference.reference_type, "stock_transfer");
        assert_eq!(reference.reference_id, doc);
        assert_eq!(reference.line_no, Some(1));
    }
}
