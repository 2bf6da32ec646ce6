//! Static status graphs, one per document type.

use crate::kind::DocumentKind;

/// Directed graph of legal status edges for one document type.
///
/// The initial state is the only editable state. States without outgoing
/// edges are terminal.
#[derive(Debug)]
pub struct StatusGraph {
    pub kind: DocumentKind,
    pub initial: &'static str,
    pub states: &'static [&'static str],
    pub edges: &'static [(&'static str, &'static str)],
}

impl StatusGraph {
    pub fn has_state(&self, status: &str) -> bool {
        self.states.contains(&status)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|&(f, t)| f == from && t == to)
    }

    /// States reachable in one step from `from`.
    pub fn targets<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.edges.iter().filter(move |(f, _)| *f == from).map(|&(_, t)| t)
    }

    /// States that may move directly to `to` (e.g. every cancellable source).
    pub fn sources<'a>(&'a self, to: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.edges.iter().filter(move |(_, t)| *t == to).map(|&(f, _)| f)
    }

    pub fn is_terminal(&self, status: &str) -> bool {
        self.has_state(status) && self.targets(status).next().is_none()
    }

    pub fn terminal_states(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.iter().copied().filter(|s| self.is_terminal(s))
    }
}

pub(crate) static GOODS_RECEIPT: StatusGraph = StatusGraph {
    kind: DocumentKind::GoodsReceipt,
    initial: "draft",
    states: &["draft", "pending", "approved", "completed", "cancelled"],
    edges: &[
        ("draft", "pending"),
        ("pending", "approved"),
        ("approved", "completed"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
        ("approved", "cancelled"),
    ],
};

pub(crate) static MATERIAL_ISSUE: StatusGraph = StatusGraph {
    kind: DocumentKind::MaterialIssue,
    initial: "draft",
    states: &["draft", "pending", "approved", "issued", "cancelled"],
    edges: &[
        ("draft", "pending"),
        ("pending", "approved"),
        ("approved", "issued"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
        ("approved", "cancelled"),
    ],
};

pub(crate) static MATERIAL_RETURN: StatusGraph = StatusGraph {
    kind: DocumentKind::MaterialReturn,
    initial: "draft",
    states: &["draft", "pending", "received", "completed", "cancelled"],
    edges: &[
        ("draft", "pending"),
        ("pending", "received"),
        ("received", "completed"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
    ],
};

pub(crate) static STOCK_TRANSFER: StatusGraph = StatusGraph {
    kind: DocumentKind::StockTransfer,
    initial: "draft",
    states: &[
        "draft",
        "pending",
        "approved",
        "shipped",
        "received",
        "completed",
        "cancelled",
    ],
    edges: &[
        ("draft", "pending"),
        ("pending", "approved"),
        ("approved", "shipped"),
        ("shipped", "received"),
        ("received", "completed"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
        ("approved", "cancelled"),
    ],
};

pub(crate) static GATE_PASS: StatusGraph = StatusGraph {
    kind: DocumentKind::GatePass,
    initial: "draft",
    states: &["draft", "pending", "approved", "released", "returned", "cancelled"],
    edges: &[
        ("draft", "pending"),
        ("pending", "approved"),
        ("approved", "released"),
        ("released", "returned"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
        ("approved", "cancelled"),
    ],
};

pub(crate) static SURPLUS_ITEM: StatusGraph = StatusGraph {
    kind: DocumentKind::SurplusItem,
    initial: "identified",
    states: &["identified", "evaluated", "approved", "actioned", "closed"],
    edges: &[
        ("identified", "evaluated"),
        ("evaluated", "approved"),
        ("approved", "actioned"),
        ("actioned", "closed"),
    ],
};

pub(crate) static TOOL: StatusGraph = StatusGraph {
    kind: DocumentKind::Tool,
    initial: "draft",
    states: &[
        "draft",
        "pending",
        "active",
        "checked_out",
        "maintenance",
        "retired",
        "cancelled",
    ],
    edges: &[
        ("draft", "pending"),
        ("pending", "active"),
        ("active", "checked_out"),
        ("checked_out", "active"),
        ("active", "maintenance"),
        ("maintenance", "active"),
        ("active", "retired"),
        ("maintenance", "retired"),
        ("draft", "cancelled"),
        ("pending", "cancelled"),
    ],
};

pub(crate) static CYCLE_COUNT: StatusGraph = StatusGraph {
    kind: DocumentKind::CycleCount,
    initial: "scheduled",
    states: &["scheduled", "in_progress", "completed", "adjusted", "cancelled"],
    edges: &[
        ("scheduled", "in_progress"),
        ("in_progress", "completed"),
        ("completed", "adjusted"),
        ("scheduled", "cancelled"),
        ("in_progress", "cancelled"),
    ],
};
