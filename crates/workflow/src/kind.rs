use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockyard_core::DomainError;

/// Document type tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    GoodsReceipt,
    MaterialIssue,
    MaterialReturn,
    StockTransfer,
    GatePass,
    SurplusItem,
    Tool,
    CycleCount,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 8] = [
        DocumentKind::GoodsReceipt,
        DocumentKind::MaterialIssue,
        DocumentKind::MaterialReturn,
        DocumentKind::StockTransfer,
        DocumentKind::GatePass,
        DocumentKind::SurplusItem,
        DocumentKind::Tool,
        DocumentKind::CycleCount,
    ];

    /// Stable tag, also used as the movement reference type.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::GoodsReceipt => "goods_receipt",
            DocumentKind::MaterialIssue => "material_issue",
            DocumentKind::MaterialReturn => "material_return",
            DocumentKind::StockTransfer => "stock_transfer",
            DocumentKind::GatePass => "gate_pass",
            DocumentKind::SurplusItem => "surplus_item",
            DocumentKind::Tool => "tool",
            DocumentKind::CycleCount => "cycle_count",
        }
    }

    /// Prefix of human-readable document numbers (`STN-000042`).
    pub fn number_prefix(self) -> &'static str {
        match self {
            DocumentKind::GoodsReceipt => "GRN",
            DocumentKind::MaterialIssue => "MIV",
            DocumentKind::MaterialReturn => "MRV",
            DocumentKind::StockTransfer => "STN",
            DocumentKind::GatePass => "GP",
            DocumentKind::SurplusItem => "SUR",
            DocumentKind::Tool => "TL",
            DocumentKind::CycleCount => "CC",
        }
    }
}

impl core::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown document type '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
        assert!("purchase_order".parse::<DocumentKind>().is_err());
    }
}
