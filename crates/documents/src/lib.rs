//! Document domain module.
//!
//! Each document type is a plain state-based aggregate whose status moves only
//! through [`Document::transition`], which consults the transition registry.
//! Ledger consequences are returned as data ([`LedgerEffect`]) for the infra
//! layer to post inside the same unit of work; nothing here performs IO.
//!
//! [`LedgerEffect`]: stockyard_inventory::LedgerEffect

pub mod cycle_count;
pub mod document;
pub mod event;
pub mod gate_pass;
pub mod goods_receipt;
pub mod line;
pub mod material_issue;
pub mod material_return;
pub mod stock_transfer;
pub mod surplus;
pub mod tool;

#[cfg(test)]
mod testing;

pub use cycle_count::{
    CountLine, CycleCount, CycleCountPatch, CycleCountStatus, NewCountLine, NewCycleCount,
};
pub use document::{Document, DocumentHeader, SpawnedDocument, StatusChange, Updated};
pub use event::{DocumentCreated, DocumentEvent, DocumentTransitioned, DocumentUpdated};
pub use gate_pass::{GatePass, GatePassPatch, GatePassStatus, GatePassType, NewGatePass};
pub use goods_receipt::{
    GoodsReceipt, GoodsReceiptPatch, GoodsReceiptStatus, NewGoodsReceipt, NewReceiptLine,
    ReceiptLine,
};
pub use line::{Condition, DocumentLine, NewLine};
pub use material_issue::{MaterialIssue, MaterialIssuePatch, MaterialIssueStatus, NewMaterialIssue};
pub use material_return::{
    MaterialReturn, MaterialReturnPatch, MaterialReturnStatus, NewMaterialReturn,
};
pub use stock_transfer::{NewStockTransfer, StockTransfer, StockTransferPatch, StockTransferStatus};
pub use surplus::{
    Disposition, NewSurplusItem, SpawnRequest, SurplusItem, SurplusItemPatch, SurplusStatus,
};
pub use tool::{NewTool, Tool, ToolPatch, ToolStatus};
